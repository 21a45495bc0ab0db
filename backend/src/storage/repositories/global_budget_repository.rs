use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::GlobalBudget;
use crate::storage::connection::DbConnection;
use crate::storage::traits::GlobalBudgetStorage;
use crate::storage::{format_timestamp, parse_timestamp};

#[derive(Clone)]
pub struct GlobalBudgetRepository {
    db: DbConnection,
}

impl GlobalBudgetRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_global_budget(row: &SqliteRow) -> Result<GlobalBudget> {
        Ok(GlobalBudget {
            id: row.try_get("id")?,
            amount: row.try_get("amount")?,
            month: row.try_get("month")?,
            year: row.try_get("year")?,
            created_at: parse_timestamp(row.try_get("created_at")?)?,
            updated_at: parse_timestamp(row.try_get("updated_at")?)?,
        })
    }
}

#[async_trait]
impl GlobalBudgetStorage for GlobalBudgetRepository {
    async fn get_global_budget(&self, month: u32, year: i32) -> Result<Option<GlobalBudget>> {
        let row = sqlx::query("SELECT * FROM global_budgets WHERE month = ? AND year = ?")
            .bind(month)
            .bind(year)
            .fetch_optional(self.db.pool().await?)
            .await
            .context("Failed to load global budget")?;

        row.as_ref().map(Self::row_to_global_budget).transpose()
    }

    async fn upsert_global_budget(&self, global_budget: &GlobalBudget) -> Result<GlobalBudget> {
        let pool = self.db.pool().await?;

        // An existing record keeps its id and creation time
        sqlx::query(
            r#"
            INSERT INTO global_budgets (id, amount, month, year, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (month, year) DO UPDATE SET
                amount = excluded.amount,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&global_budget.id)
        .bind(global_budget.amount)
        .bind(global_budget.month)
        .bind(global_budget.year)
        .bind(format_timestamp(&global_budget.created_at))
        .bind(format_timestamp(&global_budget.updated_at))
        .execute(pool)
        .await
        .context("Failed to upsert global budget")?;

        self.get_global_budget(global_budget.month, global_budget.year)
            .await?
            .with_context(|| {
                format!(
                    "Global budget for {}/{} vanished after upsert",
                    global_budget.month, global_budget.year
                )
            })
    }
}
