use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::Budget;
use crate::storage::connection::DbConnection;
use crate::storage::traits::{BudgetFilter, BudgetStorage};
use crate::storage::{format_timestamp, parse_timestamp};

#[derive(Clone)]
pub struct BudgetRepository {
    db: DbConnection,
}

impl BudgetRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_budget(row: &SqliteRow) -> Result<Budget> {
        Ok(Budget {
            id: row.try_get("id")?,
            category_id: row.try_get("category")?,
            amount: row.try_get("amount")?,
            month: row.try_get("month")?,
            year: row.try_get("year")?,
            created_at: parse_timestamp(row.try_get("created_at")?)?,
            updated_at: parse_timestamp(row.try_get("updated_at")?)?,
        })
    }
}

#[async_trait]
impl BudgetStorage for BudgetRepository {
    async fn store_budget(&self, budget: &Budget) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO budgets (id, category, amount, month, year, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&budget.id)
        .bind(&budget.category_id)
        .bind(budget.amount)
        .bind(budget.month)
        .bind(budget.year)
        .bind(format_timestamp(&budget.created_at))
        .bind(format_timestamp(&budget.updated_at))
        .execute(self.db.pool().await?)
        .await
        .context("Failed to store budget")?;
        Ok(())
    }

    async fn get_budget(&self, budget_id: &str) -> Result<Option<Budget>> {
        let row = sqlx::query("SELECT * FROM budgets WHERE id = ?")
            .bind(budget_id)
            .fetch_optional(self.db.pool().await?)
            .await
            .context("Failed to load budget")?;

        row.as_ref().map(Self::row_to_budget).transpose()
    }

    async fn find_budgets(&self, filter: &BudgetFilter) -> Result<Vec<Budget>> {
        // NULL parameters disable their clause
        let rows = sqlx::query(
            r#"
            SELECT * FROM budgets
            WHERE (?1 IS NULL OR month = ?1)
              AND (?2 IS NULL OR year = ?2)
            ORDER BY rowid
            "#,
        )
        .bind(filter.month)
        .bind(filter.year)
        .fetch_all(self.db.pool().await?)
        .await
        .context("Failed to query budgets")?;

        rows.iter().map(Self::row_to_budget).collect()
    }

    async fn find_budget_for_period(
        &self,
        category_id: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<Budget>> {
        let row = sqlx::query("SELECT * FROM budgets WHERE category = ? AND month = ? AND year = ?")
            .bind(category_id)
            .bind(month)
            .bind(year)
            .fetch_optional(self.db.pool().await?)
            .await
            .context("Failed to look up budget for period")?;

        row.as_ref().map(Self::row_to_budget).transpose()
    }

    async fn update_budget(&self, budget: &Budget) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE budgets
            SET category = ?, amount = ?, month = ?, year = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&budget.category_id)
        .bind(budget.amount)
        .bind(budget.month)
        .bind(budget.year)
        .bind(format_timestamp(&budget.updated_at))
        .bind(&budget.id)
        .execute(self.db.pool().await?)
        .await
        .context("Failed to update budget")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_budget(&self, budget_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = ?")
            .bind(budget_id)
            .execute(self.db.pool().await?)
            .await
            .context("Failed to delete budget")?;

        Ok(result.rows_affected() > 0)
    }
}
