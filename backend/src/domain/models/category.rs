use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Color given to categories created without one
pub const DEFAULT_CATEGORY_COLOR: &str = "#6366f1";

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}
