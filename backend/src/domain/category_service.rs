use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::commands::categories::CategoryCommand;
use crate::domain::errors::DomainError;
use crate::domain::models::Category;
use crate::storage::{is_unique_violation, CategoryStorage, Connection};

/// Plain CRUD over categories. Deleting a category leaves its references
/// dangling.
#[derive(Clone)]
pub struct CategoryService<C: Connection> {
    category_repository: C::CategoryRepository,
}

fn map_storage_error(error: anyhow::Error, name: &str) -> DomainError {
    if is_unique_violation(&error) {
        warn!("Category name '{}' is already taken", name);
        DomainError::conflict(format!("A category named '{}' already exists", name))
    } else {
        DomainError::Storage(error)
    }
}

impl<C: Connection> CategoryService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let category_repository = connection.create_category_repository();
        Self {
            category_repository,
        }
    }

    /// Sorted by name
    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.category_repository.list_categories().await?)
    }

    pub async fn create_category(&self, command: CategoryCommand) -> Result<Category, DomainError> {
        let now = Utc::now();
        let category = Category {
            id: Category::generate_id(),
            name: command.name,
            color: command.color,
            icon: command.icon,
            created_at: now,
            updated_at: now,
        };

        self.category_repository
            .store_category(&category)
            .await
            .map_err(|e| map_storage_error(e, &category.name))?;

        info!("Created category '{}' ({})", category.name, category.id);
        Ok(category)
    }

    pub async fn update_category(
        &self,
        category_id: &str,
        command: CategoryCommand,
    ) -> Result<Category, DomainError> {
        let existing = self
            .category_repository
            .get_category(category_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Category {} not found", category_id)))?;

        let category = Category {
            name: command.name,
            color: command.color,
            icon: command.icon,
            updated_at: Utc::now(),
            ..existing
        };

        let updated = self
            .category_repository
            .update_category(&category)
            .await
            .map_err(|e| map_storage_error(e, &category.name))?;
        if !updated {
            return Err(DomainError::not_found(format!("Category {} not found", category_id)));
        }

        info!("Updated category {}", category_id);
        Ok(category)
    }

    pub async fn delete_category(&self, category_id: &str) -> Result<(), DomainError> {
        if !self.category_repository.delete_category(category_id).await? {
            warn!("Category {} not found for deletion", category_id);
            return Err(DomainError::not_found(format!("Category {} not found", category_id)));
        }

        info!("Deleted category {}", category_id);
        Ok(())
    }
}
