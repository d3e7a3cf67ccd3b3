use super::rate::BillingTerms;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub client_id: Option<i64>,
    pub owner_id: i64, // creator; always allowed to approve
    pub billing: BillingTerms,
    pub created_at: NaiveDateTime,
}

/// Per-project assignment of a user. Its billing terms override the team
/// relation when set.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectMember {
    pub project_id: i64,
    pub user_id: i64,
    pub billing: BillingTerms,
}
