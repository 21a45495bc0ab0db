//! # Finance Tracker Backend
//!
//! Personal finance tracking over a small REST API: transactions,
//! categories, per-category budgets, a monthly global budget, and the monthly
//! analytics computed from them.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, mappers)
//!     ↓
//! Domain Layer (services, analytics aggregation)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    AnalyticsService, BudgetService, CategoryService, GlobalBudgetService, TransactionService,
};
use crate::io::rest::{analytics_apis, budget_apis, category_apis, settings_apis, transaction_apis};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub analytics_service: AnalyticsService<DbConnection>,
    pub transaction_service: TransactionService<DbConnection>,
    pub category_service: CategoryService<DbConnection>,
    pub budget_service: BudgetService<DbConnection>,
    pub global_budget_service: GlobalBudgetService<DbConnection>,
}

impl AppState {
    /// Build every service on top of one shared connection
    pub fn with_connection(db: DbConnection, default_global_budget: f64) -> Self {
        let db = Arc::new(db);
        Self {
            analytics_service: AnalyticsService::new(db.clone(), default_global_budget),
            transaction_service: TransactionService::new(db.clone()),
            category_service: CategoryService::new(db.clone()),
            budget_service: BudgetService::new(db.clone()),
            global_budget_service: GlobalBudgetService::new(db),
        }
    }
}

/// Initialize the backend with all required services.
///
/// The database is opened lazily on the first request.
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database handle for {}", config.database.url);
    let db_conn = DbConnection::new(config.database.clone());

    info!("Setting up application state");
    Ok(AppState::with_connection(db_conn, config.default_global_budget))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/analytics", analytics_apis::router())
        .nest("/budgets", budget_apis::router())
        .nest("/categories", category_apis::router())
        .nest("/transactions", transaction_apis::router())
        .nest("/settings", settings_apis::router())
        .route("/health", get(health));

    let mut app = Router::new().nest("/api", api_routes);
    if let Some(static_dir) = &config.static_dir {
        info!("Serving static files from {}", static_dir.display());
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    Ok(app.layer(cors).with_state(app_state))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
