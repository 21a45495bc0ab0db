//! Domain-level command and result types.
//!
//! Services take these instead of the public DTOs in the `shared` crate. The
//! REST mappers check the shape of incoming requests and build these types, so
//! everything here is already structurally valid.

pub mod transactions {
    use crate::domain::models::TransactionType;
    use crate::domain::month_window::MonthPeriod;
    use chrono::{DateTime, Utc};

    /// Input for creating a transaction or fully replacing an existing one.
    #[derive(Debug, Clone, PartialEq)]
    pub struct TransactionCommand {
        pub amount: f64,
        pub date: DateTime<Utc>,
        pub description: String,
        pub category: Option<String>,
        pub transaction_type: TransactionType,
    }

    /// Listing restricted to one month, or everything when `period` is None.
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub struct TransactionListQuery {
        pub period: Option<MonthPeriod>,
    }
}

pub mod categories {
    /// Input for creating a category or fully replacing an existing one.
    /// `color` has already been defaulted by the caller.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CategoryCommand {
        pub name: String,
        pub color: String,
        pub icon: Option<String>,
    }
}

pub mod budgets {
    use crate::domain::models::Budget;
    use crate::domain::month_window::MonthPeriod;

    /// Input for creating or replacing a per-category budget.
    #[derive(Debug, Clone, PartialEq)]
    pub struct BudgetCommand {
        pub category_id: String,
        pub amount: f64,
        pub period: MonthPeriod,
    }

    /// Budget listing; both month and year must be given for the filter to apply.
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub struct BudgetListQuery {
        pub period: Option<MonthPeriod>,
    }

    /// A budget together with its resolved category display data
    #[derive(Debug, Clone, PartialEq)]
    pub struct BudgetDetails {
        pub budget: Budget,
        pub category_name: String,
        pub color: String,
    }

    /// Whether a create call inserted a new record or overwrote an existing one
    #[derive(Debug, Clone, PartialEq)]
    pub enum BudgetWriteOutcome {
        Created(BudgetDetails),
        Updated(BudgetDetails),
    }

    impl BudgetWriteOutcome {
        pub fn details(&self) -> &BudgetDetails {
            match self {
                BudgetWriteOutcome::Created(details) | BudgetWriteOutcome::Updated(details) => {
                    details
                }
            }
        }
    }
}

pub mod global_budget {
    use crate::domain::month_window::MonthPeriod;

    #[derive(Debug, Clone, PartialEq)]
    pub struct SetGlobalBudgetCommand {
        pub amount: f64,
        pub period: MonthPeriod,
    }
}
