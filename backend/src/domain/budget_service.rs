//! Per-category monthly budgets.
//!
//! At most one budget exists per (category, month, year). Creating a budget for
//! an occupied slot overwrites the amount of the existing record; moving a
//! budget onto a slot held by a different record is a conflict. The store's
//! unique constraint settles races between concurrent writers.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::category_resolver::CategoryResolver;
use crate::domain::commands::budgets::{
    BudgetCommand, BudgetDetails, BudgetListQuery, BudgetWriteOutcome,
};
use crate::domain::errors::DomainError;
use crate::domain::models::{Budget, Category};
use crate::storage::{
    is_unique_violation, BudgetFilter, BudgetStorage, CategoryStorage, Connection,
};

const SLOT_TAKEN: &str = "A budget for this category already exists for the selected month and year";

fn map_storage_error(error: anyhow::Error) -> DomainError {
    if is_unique_violation(&error) {
        warn!("Budget slot taken by a concurrent write");
        DomainError::conflict(SLOT_TAKEN)
    } else {
        DomainError::Storage(error)
    }
}

#[derive(Clone)]
pub struct BudgetService<C: Connection> {
    budget_repository: C::BudgetRepository,
    category_repository: C::CategoryRepository,
}

impl<C: Connection> BudgetService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            budget_repository: connection.create_budget_repository(),
            category_repository: connection.create_category_repository(),
        }
    }

    /// Budgets in insertion order, each decorated by its position in the list
    pub async fn list_budgets(&self, query: BudgetListQuery) -> Result<Vec<BudgetDetails>, DomainError> {
        let filter = match query.period {
            Some(period) => BudgetFilter {
                month: Some(period.month()),
                year: Some(period.year()),
            },
            None => BudgetFilter::default(),
        };

        let (budgets, categories) = tokio::try_join!(
            self.budget_repository.find_budgets(&filter),
            self.category_repository.list_categories(),
        )?;
        let resolver = CategoryResolver::new(&categories);

        info!("Listed {} budgets", budgets.len());
        Ok(budgets
            .into_iter()
            .enumerate()
            .map(|(position, budget)| {
                let resolved = resolver.resolve(Some(budget.category_id.as_str()), position);
                BudgetDetails {
                    category_name: resolved.name.to_string(),
                    color: resolved.color.to_string(),
                    budget,
                }
            })
            .collect())
    }

    /// Insert a budget, or overwrite the amount of the one already holding the slot.
    /// The category must exist.
    pub async fn create_budget(&self, command: BudgetCommand) -> Result<BudgetWriteOutcome, DomainError> {
        let category = self
            .category_repository
            .get_category(&command.category_id)
            .await?
            .ok_or_else(|| {
                warn!("Budget references unknown category {}", command.category_id);
                DomainError::not_found("Category not found")
            })?;

        let month = command.period.month();
        let year = command.period.year();
        let now = Utc::now();

        let existing = self
            .budget_repository
            .find_budget_for_period(&command.category_id, month, year)
            .await?;

        if let Some(existing) = existing {
            let budget = Budget {
                amount: command.amount,
                updated_at: now,
                ..existing
            };
            if self
                .budget_repository
                .update_budget(&budget)
                .await
                .map_err(map_storage_error)?
            {
                info!("Overwrote budget {} for {}/{}", budget.id, month, year);
                return Ok(BudgetWriteOutcome::Updated(Self::with_category(budget, &category)));
            }
            warn!("Budget {} was deleted before it could be overwritten; inserting a new one", budget.id);
        }

        let budget = Budget {
            id: Budget::generate_id(),
            category_id: command.category_id,
            amount: command.amount,
            month,
            year,
            created_at: now,
            updated_at: now,
        };
        self.budget_repository
            .store_budget(&budget)
            .await
            .map_err(map_storage_error)?;

        info!("Created budget {} for {}/{}", budget.id, month, year);
        Ok(BudgetWriteOutcome::Created(Self::with_category(budget, &category)))
    }

    /// Replace a budget. A missing category is allowed and shows as "Uncategorized".
    pub async fn update_budget(
        &self,
        budget_id: &str,
        command: BudgetCommand,
    ) -> Result<BudgetDetails, DomainError> {
        let existing = self
            .budget_repository
            .get_budget(budget_id)
            .await?
            .ok_or_else(|| {
                warn!("Budget {} not found for update", budget_id);
                DomainError::not_found("Budget not found")
            })?;

        let month = command.period.month();
        let year = command.period.year();

        let occupant = self
            .budget_repository
            .find_budget_for_period(&command.category_id, month, year)
            .await?;
        if occupant.is_some_and(|other| other.id != existing.id) {
            warn!("Budget {} would collide with another budget for {}/{}", budget_id, month, year);
            return Err(DomainError::conflict(SLOT_TAKEN));
        }

        let budget = Budget {
            category_id: command.category_id,
            amount: command.amount,
            month,
            year,
            updated_at: Utc::now(),
            ..existing
        };
        if !self
            .budget_repository
            .update_budget(&budget)
            .await
            .map_err(map_storage_error)?
        {
            return Err(DomainError::not_found("Budget not found"));
        }

        let categories: Vec<Category> = self
            .category_repository
            .get_category(&budget.category_id)
            .await?
            .into_iter()
            .collect();
        let resolver = CategoryResolver::new(&categories);
        let resolved = resolver.resolve(Some(budget.category_id.as_str()), 0);

        info!("Updated budget {}", budget_id);
        Ok(BudgetDetails {
            category_name: resolved.name.to_string(),
            color: resolved.color.to_string(),
            budget,
        })
    }

    pub async fn delete_budget(&self, budget_id: &str) -> Result<(), DomainError> {
        if !self.budget_repository.delete_budget(budget_id).await? {
            warn!("Budget {} not found for deletion", budget_id);
            return Err(DomainError::not_found("Budget not found"));
        }

        info!("Deleted budget {}", budget_id);
        Ok(())
    }

    fn with_category(budget: Budget, category: &Category) -> BudgetDetails {
        BudgetDetails {
            budget,
            category_name: category.name.clone(),
            color: category.color.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::month_window::MonthPeriod;
    use crate::storage::{
        BudgetRepository, CategoryRepository, DbConnection, GlobalBudgetRepository, TransactionRepository,
    };

    async fn create_test_service() -> (Arc<DbConnection>, BudgetService<DbConnection>) {
        let db = Arc::new(DbConnection::init_test().await.expect("Failed to create test database"));
        let categories = db.create_category_repository();
        for (id, name) in [("food", "Food"), ("rent", "Rent")] {
            let now = Utc::now();
            categories
                .store_category(&Category {
                    id: id.to_string(),
                    name: name.to_string(),
                    color: format!("#{}", id),
                    icon: None,
                    created_at: now,
                    updated_at: now,
                })
                .await
                .unwrap();
        }
        let service = BudgetService::new(db.clone());
        (db, service)
    }

    fn command(category_id: &str, amount: f64, month: u32, year: i32) -> BudgetCommand {
        BudgetCommand {
            category_id: category_id.to_string(),
            amount,
            period: MonthPeriod::new(month, year).unwrap(),
        }
    }

    fn march_2024() -> BudgetListQuery {
        BudgetListQuery {
            period: Some(MonthPeriod::new(3, 2024).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_create_inserts_then_overwrites() {
        let (_db, service) = create_test_service().await;

        let first = service.create_budget(command("food", 200.0, 3, 2024)).await.unwrap();
        let created = match first {
            BudgetWriteOutcome::Created(details) => details,
            other => panic!("expected a new budget, got {:?}", other),
        };
        assert_eq!(created.category_name, "Food");
        assert_eq!(created.color, "#food");

        let second = service.create_budget(command("food", 350.0, 3, 2024)).await.unwrap();
        let updated = match second {
            BudgetWriteOutcome::Updated(details) => details,
            other => panic!("expected an overwrite, got {:?}", other),
        };
        assert_eq!(updated.budget.id, created.budget.id);
        assert_eq!(updated.budget.amount, 350.0);

        let listed = service.list_budgets(march_2024()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].budget.amount, 350.0);
    }

    #[tokio::test]
    async fn test_create_requires_existing_category() {
        let (_db, service) = create_test_service().await;

        let result = service.create_budget(command("ghost", 10.0, 3, 2024)).await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
        assert!(service.list_budgets(BudgetListQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_onto_other_budgets_slot_is_conflict() {
        let (_db, service) = create_test_service().await;
        let food = service.create_budget(command("food", 200.0, 3, 2024)).await.unwrap();
        let rent = service.create_budget(command("rent", 900.0, 3, 2024)).await.unwrap();

        let result = service
            .update_budget(&rent.details().budget.id, command("food", 1.0, 3, 2024))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        let listed = service.list_budgets(march_2024()).await.unwrap();
        let amounts: Vec<(&str, f64)> = listed
            .iter()
            .map(|d| (d.budget.category_id.as_str(), d.budget.amount))
            .collect();
        assert_eq!(amounts, vec![("food", 200.0), ("rent", 900.0)]);
        assert_eq!(listed[0].budget.id, food.details().budget.id);
    }

    #[tokio::test]
    async fn test_update_within_own_slot_and_to_new_month() {
        let (_db, service) = create_test_service().await;
        let created = service.create_budget(command("food", 200.0, 3, 2024)).await.unwrap();
        let id = created.details().budget.id.clone();

        let same_slot = service.update_budget(&id, command("food", 250.0, 3, 2024)).await.unwrap();
        assert_eq!(same_slot.budget.amount, 250.0);

        let moved = service.update_budget(&id, command("food", 250.0, 4, 2024)).await.unwrap();
        assert_eq!(moved.budget.month, 4);
        assert!(service.list_budgets(march_2024()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_to_unknown_category_is_uncategorized() {
        let (_db, service) = create_test_service().await;
        let created = service.create_budget(command("food", 200.0, 3, 2024)).await.unwrap();

        let updated = service
            .update_budget(&created.details().budget.id, command("ghost", 5.0, 3, 2024))
            .await
            .unwrap();

        assert_eq!(updated.category_name, "Uncategorized");
        assert_eq!(updated.budget.category_id, "ghost");
    }

    #[tokio::test]
    async fn test_list_resolves_dangling_categories_by_position() {
        let (db, service) = create_test_service().await;
        service.create_budget(command("food", 200.0, 3, 2024)).await.unwrap();
        service.create_budget(command("rent", 900.0, 3, 2024)).await.unwrap();
        db.create_category_repository().delete_category("rent").await.unwrap();

        let listed = service.list_budgets(march_2024()).await.unwrap();

        assert_eq!(listed[1].category_name, "Uncategorized");
        assert_eq!(listed[1].color, "#83a6ed");
        assert_eq!(listed[1].budget.category_id, "rent");
    }

    #[tokio::test]
    async fn test_list_filters_by_period() {
        let (_db, service) = create_test_service().await;
        service.create_budget(command("food", 200.0, 3, 2024)).await.unwrap();
        service.create_budget(command("food", 210.0, 4, 2024)).await.unwrap();

        assert_eq!(service.list_budgets(march_2024()).await.unwrap().len(), 1);
        assert_eq!(service.list_budgets(BudgetListQuery::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_budget() {
        let (_db, service) = create_test_service().await;
        let created = service.create_budget(command("food", 200.0, 3, 2024)).await.unwrap();
        let id = created.details().budget.id.clone();

        service.delete_budget(&id).await.unwrap();

        assert!(matches!(service.delete_budget(&id).await, Err(DomainError::NotFound(_))));
        assert!(matches!(
            service.update_budget(&id, command("food", 1.0, 3, 2024)).await,
            Err(DomainError::NotFound(_))
        ));
    }

    /// Wraps the SQLite store but reports a slot occupant that is already gone,
    /// as if another request deleted it between the lookup and the overwrite.
    #[derive(Clone)]
    struct VanishingSlotConnection {
        db: DbConnection,
    }

    #[derive(Clone)]
    struct VanishingSlotBudgets {
        inner: BudgetRepository,
    }

    #[async_trait::async_trait]
    impl BudgetStorage for VanishingSlotBudgets {
        async fn store_budget(&self, budget: &Budget) -> anyhow::Result<()> {
            self.inner.store_budget(budget).await
        }

        async fn get_budget(&self, budget_id: &str) -> anyhow::Result<Option<Budget>> {
            self.inner.get_budget(budget_id).await
        }

        async fn find_budgets(&self, filter: &BudgetFilter) -> anyhow::Result<Vec<Budget>> {
            self.inner.find_budgets(filter).await
        }

        async fn find_budget_for_period(
            &self,
            category_id: &str,
            month: u32,
            year: i32,
        ) -> anyhow::Result<Option<Budget>> {
            let now = Utc::now();
            Ok(Some(Budget {
                id: "deleted-meanwhile".to_string(),
                category_id: category_id.to_string(),
                amount: 1.0,
                month,
                year,
                created_at: now,
                updated_at: now,
            }))
        }

        async fn update_budget(&self, budget: &Budget) -> anyhow::Result<bool> {
            self.inner.update_budget(budget).await
        }

        async fn delete_budget(&self, budget_id: &str) -> anyhow::Result<bool> {
            self.inner.delete_budget(budget_id).await
        }
    }

    impl Connection for VanishingSlotConnection {
        type TransactionRepository = TransactionRepository;
        type CategoryRepository = CategoryRepository;
        type BudgetRepository = VanishingSlotBudgets;
        type GlobalBudgetRepository = GlobalBudgetRepository;

        fn create_transaction_repository(&self) -> Self::TransactionRepository {
            self.db.create_transaction_repository()
        }

        fn create_category_repository(&self) -> Self::CategoryRepository {
            self.db.create_category_repository()
        }

        fn create_budget_repository(&self) -> Self::BudgetRepository {
            VanishingSlotBudgets {
                inner: self.db.create_budget_repository(),
            }
        }

        fn create_global_budget_repository(&self) -> Self::GlobalBudgetRepository {
            self.db.create_global_budget_repository()
        }
    }

    #[tokio::test]
    async fn test_create_inserts_when_occupant_vanishes_before_overwrite() {
        let (db, _) = create_test_service().await;
        let service = BudgetService::new(Arc::new(VanishingSlotConnection { db: (*db).clone() }));

        let outcome = service.create_budget(command("food", 250.0, 3, 2024)).await.unwrap();

        let details = match outcome {
            BudgetWriteOutcome::Created(details) => details,
            other => panic!("expected a fresh insert, got {:?}", other),
        };
        assert_ne!(details.budget.id, "deleted-meanwhile");
        assert_eq!(details.budget.amount, 250.0);

        let stored = db.create_budget_repository().find_budgets(&BudgetFilter::default()).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, details.budget.id);
    }
}
