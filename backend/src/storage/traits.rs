//! # Storage Traits
//!
//! The record-store contract consumed by the domain layer. Each entity kind
//! gets its own storage trait, and a [`Connection`] hands out repositories so
//! services never name a concrete backend.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{Budget, Category, GlobalBudget, Transaction};
use crate::domain::month_window::MonthWindow;

/// Filter for transaction lookups. An empty filter matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionFilter {
    /// Inclusive range of UTC calendar dates
    pub date_range: Option<MonthWindow>,
}

impl TransactionFilter {
    pub fn within(window: MonthWindow) -> Self {
        Self {
            date_range: Some(window),
        }
    }
}

/// Filter for budget lookups; each present field must match exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BudgetFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[async_trait]
pub trait TransactionStorage: Send + Sync {
    /// Store a new transaction
    async fn store_transaction(&self, transaction: &Transaction) -> Result<()>;

    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>>;

    /// Returns matching transactions, most recent first
    async fn find_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;

    /// Replace every field of an existing transaction.
    /// Returns false when no transaction has that id.
    async fn update_transaction(&self, transaction: &Transaction) -> Result<bool>;

    /// Returns true if the transaction was found and deleted
    async fn delete_transaction(&self, transaction_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait CategoryStorage: Send + Sync {
    /// Fails with a unique violation when the name is taken
    async fn store_category(&self, category: &Category) -> Result<()>;

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>>;

    /// All categories ordered by name
    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn update_category(&self, category: &Category) -> Result<bool>;

    async fn delete_category(&self, category_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait BudgetStorage: Send + Sync {
    /// Fails with a unique violation when the (category, month, year) triple is taken
    async fn store_budget(&self, budget: &Budget) -> Result<()>;

    async fn get_budget(&self, budget_id: &str) -> Result<Option<Budget>>;

    /// Matching budgets in insertion order
    async fn find_budgets(&self, filter: &BudgetFilter) -> Result<Vec<Budget>>;

    /// The budget occupying a (category, month, year) slot, if any
    async fn find_budget_for_period(
        &self,
        category_id: &str,
        month: u32,
        year: i32,
    ) -> Result<Option<Budget>>;

    async fn update_budget(&self, budget: &Budget) -> Result<bool>;

    async fn delete_budget(&self, budget_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait GlobalBudgetStorage: Send + Sync {
    async fn get_global_budget(&self, month: u32, year: i32) -> Result<Option<GlobalBudget>>;

    /// Insert, or overwrite the amount of the record already holding (month, year)
    async fn upsert_global_budget(&self, global_budget: &GlobalBudget) -> Result<GlobalBudget>;
}

/// Factory for repositories of one storage backend.
pub trait Connection: Send + Sync + Clone + 'static {
    type TransactionRepository: TransactionStorage + Clone + 'static;
    type CategoryRepository: CategoryStorage + Clone + 'static;
    type BudgetRepository: BudgetStorage + Clone + 'static;
    type GlobalBudgetRepository: GlobalBudgetStorage + Clone + 'static;

    fn create_transaction_repository(&self) -> Self::TransactionRepository;
    fn create_category_repository(&self) -> Self::CategoryRepository;
    fn create_budget_repository(&self) -> Self::BudgetRepository;
    fn create_global_budget_repository(&self) -> Self::GlobalBudgetRepository;
}
