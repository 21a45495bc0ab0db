//! # Storage Module
//!
//! Persistence for transactions, categories, budgets and global budgets.
//!
//! The domain layer only sees the traits in [`traits`]; the SQLite
//! implementation lives in [`connection`] and [`repositories`]. Uniqueness of
//! category names, of budgets per (category, month, year) and of global
//! budgets per (month, year) is enforced here by `UNIQUE` constraints.

pub mod connection;
pub mod repositories;
pub mod traits;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

pub use connection::DbConnection;
pub use repositories::{
    BudgetRepository, CategoryRepository, GlobalBudgetRepository, TransactionRepository,
};
pub use traits::*;

/// True when the error chain contains a SQL unique-constraint violation.
pub fn is_unique_violation(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<sqlx::Error>())
        .filter_map(|sqlx_error| sqlx_error.as_database_error())
        .any(|db_error| db_error.is_unique_violation())
}

/// Timestamps are stored as fixed-width UTC RFC 3339 text so that the first
/// ten characters are always the UTC calendar date.
pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Corrupt timestamp in database: {}", value))?;
    Ok(parsed.with_timezone(&Utc))
}
