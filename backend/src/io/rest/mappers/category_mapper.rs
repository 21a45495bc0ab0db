use crate::domain::commands::categories::CategoryCommand;
use crate::domain::models::{Category as DomainCategory, DEFAULT_CATEGORY_COLOR};
use crate::domain::DomainError;
use shared::{Category as SharedCategory, CategoryRequest};

pub struct CategoryMapper;

impl CategoryMapper {
    pub fn to_command(request: CategoryRequest) -> Result<CategoryCommand, DomainError> {
        let name = request
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DomainError::validation("Category name is required"))?;

        let color = request
            .color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string());

        Ok(CategoryCommand {
            name,
            color,
            icon: request.icon.filter(|i| !i.is_empty()),
        })
    }

    pub fn to_dto(domain: DomainCategory) -> SharedCategory {
        SharedCategory {
            id: domain.id,
            name: domain.name,
            color: domain.color,
            icon: domain.icon,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
