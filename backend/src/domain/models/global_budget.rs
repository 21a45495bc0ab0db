use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Overall spending envelope for a month, one per (month, year)
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalBudget {
    pub id: String,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GlobalBudget {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}
