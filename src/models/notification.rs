use chrono::NaiveDateTime;
use serde::Serialize;

/// A row of a user's notification channel.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: i64,
    pub recipient_id: i64,
    pub kind: String,
    pub payload: serde_json::Value,
    pub created_at: NaiveDateTime,
    pub read_at: Option<NaiveDateTime>,
}
