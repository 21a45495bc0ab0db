//! Monthly analytics aggregation.
//!
//! For a requested month this combines:
//! 1. the month's transactions and per-category budgets
//! 2. the previous month's transactions (for the carried balance)
//! 3. all categories (for display names)
//! 4. the month's global budget, or the configured default
//!
//! into a [`MonthlyAnalytics`]. Nothing is cached; every call reads the store
//! afresh and any failed read fails the whole computation.

use std::collections::HashMap;
use std::sync::Arc;

use shared::{BudgetComparison, CategoryExpense, MonthComparison, MonthlyAnalytics};
use tracing::info;

use crate::domain::carry_forward::{carry_forward_balance, MonthTotals};
use crate::domain::category_resolver::CategoryResolver;
use crate::domain::errors::DomainError;
use crate::domain::models::{Budget, Category, Transaction};
use crate::domain::month_comparison::compare_months;
use crate::domain::month_window::MonthPeriod;
use crate::storage::{
    BudgetFilter, BudgetStorage, CategoryStorage, Connection, GlobalBudgetStorage,
    TransactionFilter, TransactionStorage,
};

/// Everything the aggregation needs, already fetched
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsInputs<'a> {
    pub transactions: &'a [Transaction],
    pub previous_transactions: &'a [Transaction],
    /// Budgets of the month in store order
    pub budgets: &'a [Budget],
    pub categories: &'a [Category],
    pub global_budget: f64,
}

/// Pure aggregation over fetched records
pub fn aggregate_month(inputs: AnalyticsInputs<'_>) -> MonthlyAnalytics {
    let resolver = CategoryResolver::new(inputs.categories);

    let prev_month_balance = carry_forward_balance(inputs.previous_transactions);
    let totals = MonthTotals::from_transactions(inputs.transactions);

    let total_allocated_budget: f64 = inputs.budgets.iter().map(|budget| budget.amount).sum();
    let total_income = inputs.global_budget + prev_month_balance.max(0.0);
    let current_balance = inputs.global_budget - total_allocated_budget + prev_month_balance;

    MonthlyAnalytics {
        total_income,
        current_month_income: totals.income,
        total_expenses: totals.expenses,
        net_savings: total_income - totals.expenses,
        current_balance,
        prev_month_balance,
        transaction_count: inputs.transactions.len(),
        expenses_by_category: expenses_by_category(inputs.transactions, &resolver),
        budget_comparison: budget_comparison(inputs.transactions, inputs.budgets, &resolver),
    }
}

/// Expense totals grouped by resolved category name, in first-seen order
fn expenses_by_category(
    transactions: &[Transaction],
    resolver: &CategoryResolver,
) -> Vec<CategoryExpense> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CategoryExpense> = Vec::new();

    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        let name = resolver.name_of(transaction.category.as_deref());
        match positions.get(name) {
            Some(&index) => groups[index].amount += transaction.amount,
            None => {
                positions.insert(name, groups.len());
                groups.push(CategoryExpense {
                    category: name.to_string(),
                    amount: transaction.amount,
                });
            }
        }
    }

    groups
}

fn budget_comparison(
    transactions: &[Transaction],
    budgets: &[Budget],
    resolver: &CategoryResolver,
) -> Vec<BudgetComparison> {
    budgets
        .iter()
        .enumerate()
        .map(|(position, budget)| {
            let spent: f64 = transactions
                .iter()
                .filter(|t| t.is_expense() && t.category.as_deref() == Some(budget.category_id.as_str()))
                .map(|t| t.amount)
                .sum();
            let percentage = if budget.amount > 0.0 {
                spent / budget.amount * 100.0
            } else {
                0.0
            };

            BudgetComparison {
                category: resolver
                    .resolve(Some(budget.category_id.as_str()), position)
                    .name
                    .to_string(),
                category_id: budget.category_id.clone(),
                budgeted: budget.amount,
                spent,
                percentage,
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct AnalyticsService<C: Connection> {
    transaction_repository: C::TransactionRepository,
    category_repository: C::CategoryRepository,
    budget_repository: C::BudgetRepository,
    global_budget_repository: C::GlobalBudgetRepository,
    default_global_budget: f64,
}

impl<C: Connection> AnalyticsService<C> {
    pub fn new(connection: Arc<C>, default_global_budget: f64) -> Self {
        Self {
            transaction_repository: connection.create_transaction_repository(),
            category_repository: connection.create_category_repository(),
            budget_repository: connection.create_budget_repository(),
            global_budget_repository: connection.create_global_budget_repository(),
            default_global_budget,
        }
    }

    pub async fn monthly_analytics(&self, period: MonthPeriod) -> Result<MonthlyAnalytics, DomainError> {
        info!("Computing analytics for {}/{}", period.month(), period.year());

        let current_filter = TransactionFilter::within(period.window()?);
        let previous_filter = TransactionFilter::within(period.previous().window()?);
        let budget_filter = BudgetFilter {
            month: Some(period.month()),
            year: Some(period.year()),
        };

        let (transactions, previous_transactions, budgets, categories, global_budget) = tokio::try_join!(
            self.transaction_repository.find_transactions(&current_filter),
            self.transaction_repository.find_transactions(&previous_filter),
            self.budget_repository.find_budgets(&budget_filter),
            self.category_repository.list_categories(),
            self.global_budget_repository
                .get_global_budget(period.month(), period.year()),
        )?;

        let global_budget = global_budget
            .map(|record| record.amount)
            .unwrap_or(self.default_global_budget);

        let analytics = aggregate_month(AnalyticsInputs {
            transactions: &transactions,
            previous_transactions: &previous_transactions,
            budgets: &budgets,
            categories: &categories,
            global_budget,
        });

        info!(
            "Analytics for {}/{}: {} transactions, expenses {:.2}, balance {:.2}",
            period.month(),
            period.year(),
            analytics.transaction_count,
            analytics.total_expenses,
            analytics.current_balance
        );
        Ok(analytics)
    }

    /// Analytics for `period` compared against the month before it
    pub async fn month_comparison(&self, period: MonthPeriod) -> Result<MonthComparison, DomainError> {
        let (current, previous) = tokio::try_join!(
            self.monthly_analytics(period),
            self.monthly_analytics(period.previous()),
        )?;
        Ok(compare_months(current, previous))
    }
}
