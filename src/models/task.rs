use super::status::TaskStatus;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub status: TaskStatus,
    pub created_at: NaiveDateTime,
}
