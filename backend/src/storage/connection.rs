use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::storage::repositories::{
    BudgetRepository, CategoryRepository, GlobalBudgetRepository, TransactionRepository,
};
use crate::storage::traits::Connection;

/// DbConnection owns the process-wide SQLite pool.
///
/// The pool is opened on first use. Concurrent first callers wait on the same
/// initialization and all end up sharing one pool; clones share it too.
#[derive(Clone)]
pub struct DbConnection {
    config: Arc<DatabaseConfig>,
    pool: Arc<OnceCell<SqlitePool>>,
}

impl DbConnection {
    /// Create a handle without touching the database
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config: Arc::new(config),
            pool: Arc::new(OnceCell::new()),
        }
    }

    /// Create a handle and open the pool immediately
    pub async fn init(config: DatabaseConfig) -> Result<Self> {
        let db = Self::new(config);
        db.pool().await?;
        Ok(db)
    }

    /// Initialize a private in-memory database for a single test
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        Self::init(DatabaseConfig::in_memory()).await
    }

    /// Get the pool, connecting and creating the schema on first use
    pub async fn pool(&self) -> Result<&SqlitePool> {
        self.pool.get_or_try_init(|| Self::connect(&self.config)).await
    }

    /// Whether the pool has been opened yet
    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }

    async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
        info!("Connecting to database at {}", config.url);

        let options = SqliteConnectOptions::from_str(&config.url)
            .with_context(|| format!("Invalid database URL: {}", config.url))?
            .create_if_missing(true);

        // In-memory databases vanish with their last connection, so pooled
        // connections are never retired.
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database at {}", config.url))?;

        Self::setup_schema(&pool).await?;
        info!("Database ready");

        Ok(pool)
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT,
                transaction_type TEXT NOT NULL CHECK (transaction_type IN ('income', 'expense')),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Month bucketing filters on the date prefix
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_transactions_date
            ON transactions(date DESC);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                color TEXT NOT NULL,
                icon TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS budgets (
                id TEXT PRIMARY KEY,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                month INTEGER NOT NULL CHECK (month >= 1 AND month <= 12),
                year INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (category, month, year)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS global_budgets (
                id TEXT PRIMARY KEY,
                amount REAL NOT NULL,
                month INTEGER NOT NULL CHECK (month >= 1 AND month <= 12),
                year INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (month, year)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type TransactionRepository = TransactionRepository;
    type CategoryRepository = CategoryRepository;
    type BudgetRepository = BudgetRepository;
    type GlobalBudgetRepository = GlobalBudgetRepository;

    fn create_transaction_repository(&self) -> Self::TransactionRepository {
        TransactionRepository::new(self.clone())
    }

    fn create_category_repository(&self) -> Self::CategoryRepository {
        CategoryRepository::new(self.clone())
    }

    fn create_budget_repository(&self) -> Self::BudgetRepository {
        BudgetRepository::new(self.clone())
    }

    fn create_global_budget_repository(&self) -> Self::GlobalBudgetRepository {
        GlobalBudgetRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn file_config(path: &std::path::Path) -> DatabaseConfig {
        DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            max_connections: 2,
            connect_timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_connection_is_lazy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lazy.db");
        let db = DbConnection::new(file_config(&path));

        assert!(!db.is_connected());
        assert!(!path.exists(), "Nothing should be created before first use");

        db.pool().await.expect("Failed to open pool");

        assert!(db.is_connected());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_concurrent_first_use_shares_one_pool() {
        let dir = tempfile::tempdir().unwrap();
        let db = DbConnection::new(file_config(&dir.path().join("shared.db")));
        let clone = db.clone();

        let (a, b) = tokio::join!(db.pool(), clone.pool());
        let a = a.expect("first init failed");
        let b = b.expect("second init failed");

        assert!(std::ptr::eq(a, b), "Both callers must receive the same pool");
    }

    #[tokio::test]
    async fn test_schema_setup_is_idempotent() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let pool = db.pool().await.unwrap();

        DbConnection::setup_schema(pool).await.expect("Second schema setup failed");
    }

    #[tokio::test]
    async fn test_failed_connection_leaves_handle_unconnected() {
        let dir = tempfile::tempdir().unwrap();
        let db = DbConnection::new(file_config(&dir.path().join("missing").join("finance.db")));

        assert!(db.pool().await.is_err());
        assert!(!db.is_connected());
    }
}
