use super::time_log::TimeLog;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalEventKind {
    Approved,
    Rejected,
}

impl ApprovalEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalEventKind::Approved => "time_log_approved",
            ApprovalEventKind::Rejected => "time_log_rejected",
        }
    }
}

/// Raised once per successful transition; delivered by an `EventSink`.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalEvent {
    pub kind: ApprovalEventKind,
    pub time_log: TimeLog,
    pub approver_id: i64,
    pub owner_id: i64,
}
