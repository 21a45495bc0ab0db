//! Balance carry-forward between consecutive months.
//!
//! A month's balance is simply its income minus its expenses. The previous
//! month's balance feeds into the next month's analytics: a surplus is added to
//! the available income, and any balance (surplus or deficit) shifts the
//! current balance.

use crate::domain::models::{Transaction, TransactionType};

/// Income and expense sums over a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthTotals {
    pub income: f64,
    pub expenses: f64,
}

impl MonthTotals {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions
            .iter()
            .fold(Self::default(), |mut totals, transaction| {
                match transaction.transaction_type {
                    TransactionType::Income => totals.income += transaction.amount,
                    TransactionType::Expense => totals.expenses += transaction.amount,
                }
                totals
            })
    }

    /// Income minus expenses, negative for an overspent month
    pub fn balance(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Net balance of a month's transactions
pub fn carry_forward_balance(transactions: &[Transaction]) -> f64 {
    MonthTotals::from_transactions(transactions).balance()
}
