use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of money movement. There is no third variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received
    Income,
    /// Money spent
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Positive monetary value
    pub amount: f64,
    /// Moment the transaction happened (UTC)
    pub date: DateTime<Utc>,
    pub description: String,
    /// Category id, absent for uncategorized transactions
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating or fully replacing a transaction.
///
/// Every field is optional on the wire so that missing fields surface as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub amount: Option<f64>,
    /// RFC 3339 timestamp or plain `YYYY-MM-DD` date
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: Option<String>,
    /// Defaults to indigo when omitted
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// A per-category budget decorated with its category's display name and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetView {
    pub id: String,
    /// Resolved category name ("Uncategorized" for dangling references)
    pub category: String,
    pub category_id: String,
    pub amount: f64,
    pub color: String,
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetListResponse {
    pub budgets: Vec<BudgetView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    /// Category id
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalBudget {
    pub id: String,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalBudgetRequest {
    pub amount: Option<f64>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Summed expenses for one resolved category name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryExpense {
    pub category: String,
    pub amount: f64,
}

/// Budgeted versus actually spent for one budget record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetComparison {
    /// Resolved category name
    pub category: String,
    pub category_id: String,
    pub budgeted: f64,
    pub spent: f64,
    /// `spent / budgeted * 100`, or 0 when nothing was budgeted
    pub percentage: f64,
}

/// Analytics for a single month. Computed on every request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAnalytics {
    /// Global budget plus the previous month's balance when positive
    pub total_income: f64,
    /// Sum of income transactions recorded in the month
    pub current_month_income: f64,
    pub total_expenses: f64,
    pub net_savings: f64,
    pub current_balance: f64,
    /// Previous month's income minus expenses, may be negative
    pub prev_month_balance: f64,
    pub transaction_count: usize,
    pub expenses_by_category: Vec<CategoryExpense>,
    pub budget_comparison: Vec<BudgetComparison>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

/// Month-over-month view of two consecutive analytics results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthComparison {
    pub current: MonthlyAnalytics,
    pub previous: MonthlyAnalytics,
    /// Percent change, 0 when the previous value is 0
    pub income_change: f64,
    pub expense_change: f64,
    pub savings_change: f64,
    pub savings_rate: f64,
    pub top_categories: Vec<CategoryExpense>,
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_type_wire_format() {
        assert_eq!(serde_json::to_value(TransactionType::Income).unwrap(), json!("income"));
        assert_eq!(serde_json::to_value(TransactionType::Expense).unwrap(), json!("expense"));
        assert!(serde_json::from_value::<TransactionType>(json!("transfer")).is_err());
    }

    #[test]
    fn test_transaction_request_reads_type_field() {
        let request: TransactionRequest = serde_json::from_value(json!({
            "amount": 12.5,
            "date": "2024-03-02",
            "description": "Lunch",
            "type": "expense"
        }))
        .unwrap();

        assert_eq!(request.transaction_type, Some(TransactionType::Expense));
        assert_eq!(request.category, None);
    }

    #[test]
    fn test_request_with_missing_fields_still_deserializes() {
        let request: BudgetRequest = serde_json::from_value(json!({ "amount": 10.0 })).unwrap();
        assert_eq!(request.category, None);
        assert_eq!(request.month, None);
    }

    #[test]
    fn test_analytics_uses_camel_case_keys() {
        let analytics = MonthlyAnalytics {
            total_income: 1.0,
            current_month_income: 0.0,
            total_expenses: 0.0,
            net_savings: 1.0,
            current_balance: 1.0,
            prev_month_balance: 0.0,
            transaction_count: 0,
            expenses_by_category: vec![],
            budget_comparison: vec![BudgetComparison {
                category: "Food".to_string(),
                category_id: "c1".to_string(),
                budgeted: 10.0,
                spent: 5.0,
                percentage: 50.0,
            }],
        };

        let value = serde_json::to_value(&analytics).unwrap();
        assert!(value.get("totalIncome").is_some());
        assert!(value.get("prevMonthBalance").is_some());
        assert!(value.get("expensesByCategory").is_some());
        assert_eq!(value["budgetComparison"][0]["categoryId"], json!("c1"));
    }
}
