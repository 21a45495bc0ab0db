use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::Transaction;
use crate::storage::connection::DbConnection;
use crate::storage::traits::{TransactionFilter, TransactionStorage};
use crate::storage::{format_timestamp, parse_timestamp};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed transaction store
#[derive(Clone)]
pub struct TransactionRepository {
    db: DbConnection,
}

impl TransactionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_transaction(row: &SqliteRow) -> Result<Transaction> {
        let transaction_type: String = row.try_get("transaction_type")?;
        Ok(Transaction {
            id: row.try_get("id")?,
            amount: row.try_get("amount")?,
            date: parse_timestamp(row.try_get("date")?)?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            transaction_type: transaction_type.parse()?,
            created_at: parse_timestamp(row.try_get("created_at")?)?,
            updated_at: parse_timestamp(row.try_get("updated_at")?)?,
        })
    }
}

#[async_trait]
impl TransactionStorage for TransactionRepository {
    async fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, amount, date, description, category, transaction_type, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.id)
        .bind(transaction.amount)
        .bind(format_timestamp(&transaction.date))
        .bind(&transaction.description)
        .bind(&transaction.category)
        .bind(transaction.transaction_type.as_str())
        .bind(format_timestamp(&transaction.created_at))
        .bind(format_timestamp(&transaction.updated_at))
        .execute(self.db.pool().await?)
        .await
        .context("Failed to store transaction")?;
        Ok(())
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        let row = sqlx::query("SELECT * FROM transactions WHERE id = ?")
            .bind(transaction_id)
            .fetch_optional(self.db.pool().await?)
            .await
            .context("Failed to load transaction")?;

        row.as_ref().map(Self::row_to_transaction).transpose()
    }

    async fn find_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let pool = self.db.pool().await?;

        // The first ten characters of a stored timestamp are its UTC date
        let rows = match filter.date_range {
            Some(window) => {
                sqlx::query(
                    r#"
                    SELECT * FROM transactions
                    WHERE substr(date, 1, 10) BETWEEN ? AND ?
                    ORDER BY date DESC, id
                    "#,
                )
                .bind(window.start.format(DATE_FORMAT).to_string())
                .bind(window.end.format(DATE_FORMAT).to_string())
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query("SELECT * FROM transactions ORDER BY date DESC, id")
                    .fetch_all(pool)
                    .await
            }
        }
        .context("Failed to query transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn update_transaction(&self, transaction: &Transaction) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET amount = ?, date = ?, description = ?, category = ?,
                transaction_type = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(transaction.amount)
        .bind(format_timestamp(&transaction.date))
        .bind(&transaction.description)
        .bind(&transaction.category)
        .bind(transaction.transaction_type.as_str())
        .bind(format_timestamp(&transaction.updated_at))
        .bind(&transaction.id)
        .execute(self.db.pool().await?)
        .await
        .context("Failed to update transaction")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(transaction_id)
            .execute(self.db.pool().await?)
            .await
            .context("Failed to delete transaction")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TransactionType;
    use crate::domain::month_window::MonthPeriod;
    use chrono::{TimeZone, Utc};

    async fn setup_test() -> TransactionRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        TransactionRepository::new(db)
    }

    fn transaction(
        id: &str,
        amount: f64,
        (year, month, day, hour): (i32, u32, u32, u32),
        transaction_type: TransactionType,
    ) -> Transaction {
        let date = Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap();
        Transaction {
            id: id.to_string(),
            amount,
            date,
            description: format!("Transaction {}", id),
            category: Some("cat-1".to_string()),
            transaction_type,
            created_at: date,
            updated_at: date,
        }
    }

    fn march_2024() -> TransactionFilter {
        TransactionFilter::within(MonthPeriod::new(3, 2024).unwrap().window().unwrap())
    }

    #[tokio::test]
    async fn test_store_and_get_transaction() {
        let repo = setup_test().await;
        let tx = transaction("t1", 42.5, (2024, 3, 5, 12), TransactionType::Expense);

        repo.store_transaction(&tx).await.expect("Failed to store transaction");

        let loaded = repo.get_transaction("t1").await.unwrap();
        assert_eq!(loaded, Some(tx));
        assert!(repo.get_transaction("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_uncategorized_transaction_round_trips_null_category() {
        let repo = setup_test().await;
        let mut tx = transaction("t1", 10.0, (2024, 3, 5, 12), TransactionType::Income);
        tx.category = None;

        repo.store_transaction(&tx).await.unwrap();

        assert_eq!(repo.get_transaction("t1").await.unwrap().unwrap().category, None);
    }

    #[tokio::test]
    async fn test_month_filter_includes_whole_last_day() {
        let repo = setup_test().await;
        for tx in [
            transaction("feb-end", 1.0, (2024, 2, 29, 23), TransactionType::Expense),
            transaction("mar-start", 2.0, (2024, 3, 1, 0), TransactionType::Expense),
            transaction("mar-end", 3.0, (2024, 3, 31, 23), TransactionType::Expense),
            transaction("apr-start", 4.0, (2024, 4, 1, 0), TransactionType::Expense),
        ] {
            repo.store_transaction(&tx).await.unwrap();
        }

        let found = repo.find_transactions(&march_2024()).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["mar-end", "mar-start"]);
    }

    #[tokio::test]
    async fn test_unfiltered_query_returns_most_recent_first() {
        let repo = setup_test().await;
        repo.store_transaction(&transaction("old", 1.0, (2023, 12, 1, 8), TransactionType::Income))
            .await
            .unwrap();
        repo.store_transaction(&transaction("new", 1.0, (2024, 1, 1, 8), TransactionType::Income))
            .await
            .unwrap();

        let all = repo.find_transactions(&TransactionFilter::default()).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_update_transaction() {
        let repo = setup_test().await;
        let tx = transaction("t1", 10.0, (2024, 3, 5, 12), TransactionType::Expense);
        repo.store_transaction(&tx).await.unwrap();

        let mut replacement = transaction("t1", 99.0, (2024, 4, 2, 9), TransactionType::Income);
        replacement.category = None;
        assert!(repo.update_transaction(&replacement).await.unwrap());

        let loaded = repo.get_transaction("t1").await.unwrap().unwrap();
        assert_eq!(loaded.amount, 99.0);
        assert_eq!(loaded.transaction_type, TransactionType::Income);
        assert_eq!(loaded.category, None);
        // Creation time is never rewritten
        assert_eq!(loaded.created_at, tx.created_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let repo = setup_test().await;
        let ghost = transaction("ghost", 1.0, (2024, 3, 5, 12), TransactionType::Expense);

        assert!(!repo.update_transaction(&ghost).await.unwrap());
        assert!(!repo.delete_transaction("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let repo = setup_test().await;
        repo.store_transaction(&transaction("t1", 1.0, (2024, 3, 5, 12), TransactionType::Expense))
            .await
            .unwrap();

        assert!(repo.delete_transaction("t1").await.unwrap());
        assert!(repo.get_transaction("t1").await.unwrap().is_none());
    }
}
