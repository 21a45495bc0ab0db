use crate::domain::commands::budgets::{BudgetCommand, BudgetDetails};
use crate::domain::{DomainError, MonthPeriod};
use shared::{BudgetRequest, BudgetView};

pub struct BudgetMapper;

impl BudgetMapper {
    pub fn to_command(request: BudgetRequest) -> Result<BudgetCommand, DomainError> {
        let (Some(category_id), Some(amount), Some(month), Some(year)) =
            (request.category, request.amount, request.month, request.year)
        else {
            return Err(DomainError::validation("Missing required fields"));
        };

        let category_id = category_id.trim().to_string();
        if category_id.is_empty() {
            return Err(DomainError::validation("Missing required fields"));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::validation("Budget amount must be a positive number"));
        }

        Ok(BudgetCommand {
            category_id,
            amount,
            period: MonthPeriod::new(month, year)?,
        })
    }

    pub fn to_view(details: &BudgetDetails) -> BudgetView {
        BudgetView {
            id: details.budget.id.clone(),
            category: details.category_name.clone(),
            category_id: details.budget.category_id.clone(),
            amount: details.budget.amount,
            color: details.color.clone(),
            month: details.budget.month,
            year: details.budget.year,
        }
    }
}
