use crate::domain::commands::global_budget::SetGlobalBudgetCommand;
use crate::domain::models::GlobalBudget as DomainGlobalBudget;
use crate::domain::{DomainError, MonthPeriod};
use shared::{GlobalBudget as SharedGlobalBudget, GlobalBudgetRequest};

pub struct GlobalBudgetMapper;

impl GlobalBudgetMapper {
    /// Zero is a valid amount; only absent fields and negative amounts are rejected
    pub fn to_command(request: GlobalBudgetRequest) -> Result<SetGlobalBudgetCommand, DomainError> {
        let (Some(amount), Some(month), Some(year)) = (request.amount, request.month, request.year)
        else {
            return Err(DomainError::validation("Missing required fields"));
        };

        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::validation("Global budget must not be negative"));
        }

        Ok(SetGlobalBudgetCommand {
            amount,
            period: MonthPeriod::new(month, year)?,
        })
    }

    pub fn to_dto(domain: DomainGlobalBudget) -> SharedGlobalBudget {
        SharedGlobalBudget {
            id: domain.id,
            amount: domain.amount,
            month: domain.month,
            year: domain.year,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
