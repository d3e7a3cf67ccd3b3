use super::rate::BillingTerms;
use serde::Serialize;

/// Leader → member relation carrying billing defaults for the leader's projects.
#[derive(Debug, Clone, Serialize)]
pub struct TeamAssignment {
    pub leader_id: i64,
    pub member_id: i64,
    pub billing: BillingTerms,
    pub is_employee: bool,
}
