use crate::core::policy::ensure_can_modify;
use crate::db::catalog::find_task;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::time_logs;
use crate::errors::{AppError, AppResult};
use crate::models::time_log::{TimeLog, checked_duration, duration_between};
use crate::utils::time::now;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Owner-editable fields; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct LogChanges {
    pub task_id: Option<i64>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub duration: Option<Decimal>,
    pub note: Option<String>,
    pub non_billable: Option<bool>,
}

impl LogChanges {
    pub fn is_empty(&self) -> bool {
        self.task_id.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.duration.is_none()
            && self.note.is_none()
            && self.non_billable.is_none()
    }
}

/// Merge `changes` into `log`. A log with a full interval always derives
/// its duration from it.
pub fn merge_changes(log: &mut TimeLog, changes: &LogChanges) -> AppResult<()> {
    if let Some(start) = changes.start {
        log.start = Some(start);
    }
    if let Some(end) = changes.end {
        log.end = Some(end);
    }

    match (log.start, log.end) {
        (Some(start), Some(end)) => {
            if changes.duration.is_some() {
                return Err(AppError::Validation(
                    "duration is computed from start/end for this log".into(),
                ));
            }
            log.duration = duration_between(start, end)?;
        }
        (None, None) => {
            if let Some(d) = changes.duration {
                log.duration = checked_duration(d)?;
            }
        }
        _ => {
            return Err(AppError::Validation(
                "start and end must be given together".into(),
            ));
        }
    }

    if let Some(task_id) = changes.task_id {
        log.task_id = Some(task_id);
    }
    if let Some(note) = &changes.note {
        log.note = note.clone();
    }
    if let Some(nb) = changes.non_billable {
        log.non_billable = nb;
    }
    Ok(())
}

pub struct EditLogic;

impl EditLogic {
    pub fn apply(pool: &mut DbPool, id: i64, actor_id: i64, changes: &LogChanges) -> AppResult<TimeLog> {
        if changes.is_empty() {
            return Err(AppError::Validation("nothing to change".into()));
        }

        let tx = pool.conn.transaction()?;
        let mut log = time_logs::get(&tx, id)?;
        ensure_can_modify(actor_id, &log)?;

        if let Some(task_id) = changes.task_id {
            let task = find_task(&tx, task_id)?.ok_or(AppError::NotFound {
                entity: "task",
                id: task_id,
            })?;
            if task.project_id != log.project_id {
                return Err(AppError::Validation(format!(
                    "task #{} does not belong to project #{}",
                    task_id, log.project_id
                )));
            }
        }

        merge_changes(&mut log, changes)?;
        log.updated_at = now();

        if time_logs::update_details(&tx, &log)? == 0 {
            return Err(AppError::InvalidState(format!(
                "time log #{id} is paid and can no longer be changed"
            )));
        }

        ttlog(
            &tx,
            "edit",
            &format!("time_log #{id}"),
            &format!("edited by user {actor_id} ({}h)", log.duration),
        )?;
        tx.commit()?;

        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time_log::NewTimeLog;
    use crate::utils::time::parse_datetime;
    use rust_decimal_macros::dec;

    fn interval_log() -> TimeLog {
        let new = NewTimeLog {
            user_id: 1,
            project_id: 1,
            start: parse_datetime("2025-03-03 09:00"),
            end: parse_datetime("2025-03-03 10:00"),
            ..Default::default()
        };
        TimeLog::from_new(1, &new).unwrap()
    }

    #[test]
    fn moving_the_end_recomputes_duration() {
        let mut log = interval_log();
        let changes = LogChanges {
            end: parse_datetime("2025-03-03 11:45"),
            ..Default::default()
        };
        merge_changes(&mut log, &changes).unwrap();
        assert_eq!(log.duration, dec!(2.75));
    }

    #[test]
    fn manual_duration_conflicts_with_interval() {
        let mut log = interval_log();
        let changes = LogChanges {
            duration: Some(dec!(3)),
            ..Default::default()
        };
        assert!(merge_changes(&mut log, &changes).is_err());
    }

    #[test]
    fn manual_log_takes_new_duration() {
        let new = NewTimeLog {
            user_id: 1,
            project_id: 1,
            duration: Some(dec!(1)),
            ..Default::default()
        };
        let mut log = TimeLog::from_new(1, &new).unwrap();
        let changes = LogChanges {
            duration: Some(dec!(2.345)),
            note: Some("review".into()),
            ..Default::default()
        };
        merge_changes(&mut log, &changes).unwrap();
        assert_eq!(log.duration, dec!(2.35));
        assert_eq!(log.note, "review");
    }

    #[test]
    fn manual_edit_cannot_exceed_one_day() {
        let new = NewTimeLog {
            user_id: 1,
            project_id: 1,
            duration: Some(dec!(1)),
            ..Default::default()
        };
        let mut log = TimeLog::from_new(1, &new).unwrap();
        let changes = LogChanges {
            duration: Some(dec!(10000000000000000000000000000)),
            ..Default::default()
        };
        assert!(matches!(
            merge_changes(&mut log, &changes),
            Err(AppError::Validation(_))
        ));
        assert_eq!(log.duration, dec!(1));
    }
}
