use crate::models::time_log::TimeLog;
use crate::utils::time::format_datetime;
use serde::Serialize;

/// Flat time-log row for CSV / JSON exports. Empty cells stand for null.
#[derive(Serialize, Clone, Debug)]
pub struct TimeLogExport {
    pub id: i64,
    pub user_id: i64,
    pub project_id: i64,
    pub task_id: String,
    pub start: String,
    pub end: String,
    pub duration: String,
    pub status: String,
    pub is_paid: bool,
    pub non_billable: bool,
    pub hourly_rate: String,
    pub currency: String,
    pub paid_amount: String,
    pub approver_id: String,
    pub note: String,
    pub tags: String,
}

fn or_empty<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl TimeLogExport {
    pub fn from_log(log: &TimeLog, tags: &[String]) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            project_id: log.project_id,
            task_id: or_empty(log.task_id),
            start: or_empty(log.start.as_ref().map(format_datetime)),
            end: or_empty(log.end.as_ref().map(format_datetime)),
            duration: log.duration.to_string(),
            status: log.status.to_db_str().to_string(),
            is_paid: log.is_paid,
            non_billable: log.non_billable,
            hourly_rate: or_empty(log.hourly_rate),
            currency: or_empty(log.currency.as_ref()),
            paid_amount: or_empty(log.paid_amount),
            approver_id: or_empty(log.approver_id),
            note: log.note.clone(),
            tags: tags.join(";"),
        }
    }
}
