//! Runtime configuration read from `FINANCE_*` environment variables.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:finance.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_GLOBAL_BUDGET: f64 = 12000.0;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Connection settings for the SQLite pool
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// A private in-memory database. A single connection is kept so every
    /// query sees the same database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    /// Prebuilt frontend bundle served for non-API paths
    pub static_dir: Option<PathBuf>,
    /// Global budget used for months without a stored one
    pub default_global_budget: f64,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            static_dir: None,
            default_global_budget: DEFAULT_GLOBAL_BUDGET,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    /// Unset or empty variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let defaults = DatabaseConfig::default();
        let connect_timeout_secs: u64 = parse_var(&get, "FINANCE_DB_CONNECT_TIMEOUT_SECS", 5)?;
        let database = DatabaseConfig {
            url: get("FINANCE_DATABASE_URL").unwrap_or(defaults.url),
            max_connections: parse_var(
                &get,
                "FINANCE_DB_MAX_CONNECTIONS",
                defaults.max_connections,
            )?,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        };
        if database.max_connections == 0 {
            anyhow::bail!("FINANCE_DB_MAX_CONNECTIONS must be at least 1");
        }

        let bind_addr = parse_var(
            &get,
            "FINANCE_BIND_ADDR",
            SocketAddr::from_str(DEFAULT_BIND_ADDR)?,
        )?;

        let default_global_budget: f64 =
            parse_var(&get, "FINANCE_DEFAULT_GLOBAL_BUDGET", DEFAULT_GLOBAL_BUDGET)?;
        if !default_global_budget.is_finite() || default_global_budget < 0.0 {
            anyhow::bail!(
                "FINANCE_DEFAULT_GLOBAL_BUDGET must be a non-negative number, got {}",
                default_global_budget
            );
        }

        Ok(Self {
            database,
            bind_addr,
            cors_origin: get("FINANCE_CORS_ORIGIN")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            static_dir: get("FINANCE_STATIC_DIR").map(PathBuf::from),
            default_global_budget,
            log_filter: get("FINANCE_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

fn parse_var<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
