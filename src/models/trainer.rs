use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Trainer {
    pub id: i64,
    pub name: String,
    pub specialization: Option<String>,
    /// Daily capacity in hours
    pub working_hours: i32,
}

impl Trainer {
    /// Maximum number of session minutes this trainer may take on a single day
    pub fn max_daily_minutes(&self) -> i64 {
        max_daily_minutes(self.working_hours)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrainer {
    pub name: String,
    pub specialization: Option<String>,
    pub working_hours: i32,
}

pub fn max_daily_minutes(working_hours: i32) -> i64 {
    i64::from(working_hours) * 60
}
