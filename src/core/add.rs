use crate::core::rates::effective_rate;
use crate::db::catalog::find_task;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::projects::get_project;
use crate::db::rates::resolve_rate;
use crate::db::{tags, time_logs};
use crate::errors::{AppError, AppResult};
use crate::models::time_log::{NewTimeLog, TimeLog};
use crate::utils::money::normalize_currency;
use rusqlite::Connection;

/// High-level business logic for the `add` command.
pub struct AddLogic;

impl AddLogic {
    /// Create a pending log, its tags and the audit row in one transaction.
    pub fn apply(
        pool: &mut DbPool,
        new: &NewTimeLog,
        tag_names: &[String],
        default_currency: &str,
    ) -> AppResult<TimeLog> {
        let tx = pool.conn.transaction()?;
        let log = Self::create(&tx, new, tag_names, default_currency)?;
        tx.commit()?;
        Ok(log)
    }

    /// Insert one log on an open connection or transaction. Shared with the
    /// CSV import, which wraps a whole batch in a single transaction.
    pub fn create(
        conn: &Connection,
        new: &NewTimeLog,
        tag_names: &[String],
        default_currency: &str,
    ) -> AppResult<TimeLog> {
        let project = get_project(conn, new.project_id)?;

        if let Some(task_id) = new.task_id {
            let task = find_task(conn, task_id)?.ok_or(AppError::NotFound {
                entity: "task",
                id: task_id,
            })?;
            if task.project_id != project.id {
                return Err(AppError::Validation(format!(
                    "task #{} does not belong to project #{}",
                    task_id, project.id
                )));
            }
        }

        let mut log = TimeLog::from_new(0, new)?;
        if let Some(cur) = &log.currency {
            log.currency = Some(normalize_currency(cur)?);
        }

        // Store the rate that applies today; approval resolves it again.
        let resolved = resolve_rate(conn, project.id, new.user_id, default_currency)?;
        match effective_rate(&resolved, &log, default_currency) {
            Some((rate, currency)) => {
                log.hourly_rate = Some(rate);
                log.currency = Some(currency);
            }
            None => {
                log.hourly_rate = None;
                log.currency = None;
            }
        }

        log.id = time_logs::insert(conn, &log)?;

        for name in tag_names.iter().filter(|n| !n.trim().is_empty()) {
            let tag_id = tags::ensure_tag(conn, name)?;
            tags::attach(conn, log.id, tag_id)?;
        }

        ttlog(
            conn,
            "add",
            &format!("time_log #{}", log.id),
            &format!(
                "{}h on project #{} by user {}",
                log.duration, log.project_id, log.user_id
            ),
        )?;

        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::projects::{insert_project, upsert_member};
    use crate::models::project::ProjectMember;
    use crate::models::rate::BillingTerms;
    use crate::models::status::TimeLogStatus;
    use crate::utils::time::parse_datetime;
    use rust_decimal_macros::dec;

    fn pool() -> DbPool {
        let pool = DbPool::from_connection(Connection::open_in_memory().unwrap()).unwrap();
        init_db(&pool.conn).unwrap();
        pool
    }

    #[test]
    fn new_log_is_pending_with_resolved_rate() {
        let mut pool = pool();
        let pid = insert_project(&pool.conn, "Site", None, 1, &BillingTerms::monetary(dec!(40), "USD"))
            .unwrap();
        upsert_member(
            &pool.conn,
            &ProjectMember {
                project_id: pid,
                user_id: 2,
                billing: BillingTerms::monetary(dec!(55), "EUR"),
            },
        )
        .unwrap();

        let new = NewTimeLog {
            user_id: 2,
            project_id: pid,
            start: parse_datetime("2025-03-03 09:00"),
            end: parse_datetime("2025-03-03 10:30"),
            ..Default::default()
        };
        let log = AddLogic::apply(&mut pool, &new, &["onsite".into()], "USD").unwrap();

        assert_eq!(log.status, TimeLogStatus::Pending);
        assert!(!log.is_paid);
        assert_eq!(log.duration, dec!(1.50));
        assert_eq!(log.hourly_rate, Some(dec!(55)));
        assert_eq!(log.currency.as_deref(), Some("EUR"));
        assert_eq!(tags::tags_for(&pool.conn, log.id).unwrap(), vec!["onsite"]);
    }

    #[test]
    fn manual_rate_is_kept_when_nothing_resolves() {
        let mut pool = pool();
        let pid = insert_project(&pool.conn, "Internal", None, 1, &BillingTerms::default()).unwrap();

        let new = NewTimeLog {
            user_id: 2,
            project_id: pid,
            duration: Some(dec!(2)),
            hourly_rate: Some(dec!(30)),
            currency: Some("gbp".into()),
            ..Default::default()
        };
        let log = AddLogic::apply(&mut pool, &new, &[], "USD").unwrap();
        assert_eq!(log.hourly_rate, Some(dec!(30)));
        assert_eq!(log.currency.as_deref(), Some("GBP"));
    }

    #[test]
    fn unknown_project_is_not_found() {
        let mut pool = pool();
        let new = NewTimeLog {
            user_id: 2,
            project_id: 99,
            duration: Some(dec!(1)),
            ..Default::default()
        };
        let err = AddLogic::apply(&mut pool, &new, &[], "USD").unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
