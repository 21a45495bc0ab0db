use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::Category;
use crate::storage::connection::DbConnection;
use crate::storage::traits::CategoryStorage;
use crate::storage::{format_timestamp, parse_timestamp};

#[derive(Clone)]
pub struct CategoryRepository {
    db: DbConnection,
}

impl CategoryRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_category(row: &SqliteRow) -> Result<Category> {
        Ok(Category {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            color: row.try_get("color")?,
            icon: row.try_get("icon")?,
            created_at: parse_timestamp(row.try_get("created_at")?)?,
            updated_at: parse_timestamp(row.try_get("updated_at")?)?,
        })
    }
}

#[async_trait]
impl CategoryStorage for CategoryRepository {
    async fn store_category(&self, category: &Category) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, color, icon, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.color)
        .bind(&category.icon)
        .bind(format_timestamp(&category.created_at))
        .bind(format_timestamp(&category.updated_at))
        .execute(self.db.pool().await?)
        .await
        .context("Failed to store category")?;
        Ok(())
    }

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(self.db.pool().await?)
            .await
            .context("Failed to load category")?;

        row.as_ref().map(Self::row_to_category).transpose()
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY name")
            .fetch_all(self.db.pool().await?)
            .await
            .context("Failed to list categories")?;

        rows.iter().map(Self::row_to_category).collect()
    }

    async fn update_category(&self, category: &Category) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = ?, color = ?, icon = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&category.name)
        .bind(&category.color)
        .bind(&category.icon)
        .bind(format_timestamp(&category.updated_at))
        .bind(&category.id)
        .execute(self.db.pool().await?)
        .await
        .context("Failed to update category")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_category(&self, category_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(category_id)
            .execute(self.db.pool().await?)
            .await
            .context("Failed to delete category")?;

        Ok(result.rows_affected() > 0)
    }
}
