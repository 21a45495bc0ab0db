pub mod budget_repository;
pub mod category_repository;
pub mod global_budget_repository;
pub mod transaction_repository;

pub use budget_repository::BudgetRepository;
pub use category_repository::CategoryRepository;
pub use global_budget_repository::GlobalBudgetRepository;
pub use transaction_repository::TransactionRepository;
