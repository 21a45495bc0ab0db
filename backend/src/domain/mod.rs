//! # Domain Module
//!
//! Business logic of the finance tracker. Services here are generic over a
//! storage [`Connection`](crate::storage::Connection) and take the command
//! types from [`commands`]; they never see HTTP or SQL.

pub mod analytics_service;
pub mod budget_service;
pub mod carry_forward;
pub mod category_resolver;
pub mod category_service;
pub mod commands;
pub mod errors;
pub mod global_budget_service;
pub mod models;
pub mod month_comparison;
pub mod month_window;
pub mod transaction_service;

pub use analytics_service::AnalyticsService;
pub use budget_service::BudgetService;
pub use category_service::CategoryService;
pub use errors::DomainError;
pub use global_budget_service::GlobalBudgetService;
pub use month_window::MonthPeriod;
pub use transaction_service::TransactionService;
