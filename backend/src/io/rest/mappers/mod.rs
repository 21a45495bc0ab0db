pub mod budget_mapper;
pub mod category_mapper;
pub mod global_budget_mapper;
pub mod transaction_mapper;

pub use budget_mapper::BudgetMapper;
pub use category_mapper::CategoryMapper;
pub use global_budget_mapper::GlobalBudgetMapper;
pub use transaction_mapper::TransactionMapper;
