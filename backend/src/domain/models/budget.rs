use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Spending ceiling for one category in one month.
/// At most one exists per (category_id, month, year).
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: String,
    pub category_id: String,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}
