use chrono::NaiveDateTime;
use fake::Dummy;
use serde::{Deserialize, Serialize};

pub static DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single tracked activity: what was done, when, and where.
///
/// `id` is `None` until the server has assigned one on create; every record
/// coming back out of the service carries `Some(id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, Dummy)]
pub struct Workout {
    pub id: Option<i64>,
    pub sport: String,
    pub description: String,
    pub date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub location_name: String,
}

impl Workout {
    /// A workout never ends before it starts.
    pub fn is_valid(&self) -> bool {
        self.end_date >= self.date
    }
}
