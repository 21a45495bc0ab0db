use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::commands::global_budget::SetGlobalBudgetCommand;
use crate::domain::errors::DomainError;
use crate::domain::models::GlobalBudget;
use crate::domain::month_window::MonthPeriod;
use crate::storage::{Connection, GlobalBudgetStorage};

/// Monthly global budget settings, one record per (month, year)
#[derive(Clone)]
pub struct GlobalBudgetService<C: Connection> {
    global_budget_repository: C::GlobalBudgetRepository,
}

impl<C: Connection> GlobalBudgetService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let global_budget_repository = connection.create_global_budget_repository();
        Self {
            global_budget_repository,
        }
    }

    pub async fn get_global_budget(
        &self,
        period: MonthPeriod,
    ) -> Result<Option<GlobalBudget>, DomainError> {
        Ok(self
            .global_budget_repository
            .get_global_budget(period.month(), period.year())
            .await?)
    }

    /// Create the period's global budget or overwrite its amount
    pub async fn set_global_budget(
        &self,
        command: SetGlobalBudgetCommand,
    ) -> Result<GlobalBudget, DomainError> {
        let now = Utc::now();
        let candidate = GlobalBudget {
            id: GlobalBudget::generate_id(),
            amount: command.amount,
            month: command.period.month(),
            year: command.period.year(),
            created_at: now,
            updated_at: now,
        };

        let stored = self
            .global_budget_repository
            .upsert_global_budget(&candidate)
            .await?;
        info!(
            "Global budget for {}/{} set to {:.2}",
            stored.month, stored.year, stored.amount
        );
        Ok(stored)
    }
}
