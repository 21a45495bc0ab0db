pub mod budget;
pub mod category;
pub mod global_budget;
pub mod transaction;

pub use budget::Budget;
pub use category::{Category, DEFAULT_CATEGORY_COLOR};
pub use global_budget::GlobalBudget;
pub use transaction::{Transaction, TransactionType};
