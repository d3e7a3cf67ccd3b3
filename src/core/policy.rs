use crate::errors::{AppError, AppResult};
use crate::models::time_log::TimeLog;

/// Only the owner may change a log, and only until it has been paid.
pub fn ensure_can_modify(actor_id: i64, log: &TimeLog) -> AppResult<()> {
    if log.user_id != actor_id {
        return Err(AppError::NotAuthorized(format!(
            "time log #{} belongs to user {}",
            log.id, log.user_id
        )));
    }
    if log.is_paid {
        return Err(AppError::InvalidState(format!(
            "time log #{} is paid and can no longer be changed",
            log.id
        )));
    }
    Ok(())
}
