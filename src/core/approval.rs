//! Time-log approval workflow.
//!
//! `apply_transition` is the pure state machine; `ApprovalEngine` runs it
//! against the database inside one IMMEDIATE transaction and hands the
//! resulting event to an `EventSink` once the transaction has committed.

use crate::core::events::EventSink;
use crate::core::rates::effective_rate;
use crate::db::access::can_approve;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::rates::resolve_rate;
use crate::db::time_logs;
use crate::errors::{AppError, AppResult};
use crate::models::approval_event::{ApprovalEvent, ApprovalEventKind};
use crate::models::rate::ResolvedRate;
use crate::models::status::TimeLogStatus;
use crate::models::time_log::TimeLog;
use crate::ui::messages::warning;
use crate::utils::money::price;
use crate::utils::time::now;
use chrono::NaiveDateTime;
use rusqlite::TransactionBehavior;

/// Everything the state machine needs besides the record itself.
#[derive(Debug, Clone)]
pub struct TransitionRequest<'a> {
    pub target: TimeLogStatus,
    pub approver_id: i64,
    pub comment: Option<String>,
    /// Outcome of the authorization lookup for (approver, project).
    pub authorized: bool,
    pub rate: &'a ResolvedRate,
    pub default_currency: &'a str,
    pub at: NaiveDateTime,
}

/// Apply a status transition to `log` in memory.
///
/// Checks, in order: the target is approved/rejected, the approver is
/// authorized, the log is still pending. On any failure `log` is untouched.
pub fn apply_transition(log: &mut TimeLog, req: &TransitionRequest) -> AppResult<ApprovalEvent> {
    let kind = match req.target {
        TimeLogStatus::Approved => ApprovalEventKind::Approved,
        TimeLogStatus::Rejected => ApprovalEventKind::Rejected,
        TimeLogStatus::Pending => {
            return Err(AppError::InvalidState(format!(
                "time log #{} cannot be moved back to pending",
                log.id
            )));
        }
    };

    if !req.authorized {
        return Err(AppError::NotAuthorized(format!(
            "user {} may not approve time logs of project #{}",
            req.approver_id, log.project_id
        )));
    }

    if !log.status.is_pending() {
        return Err(AppError::InvalidState(format!(
            "time log #{} is already {}",
            log.id,
            log.status.to_db_str()
        )));
    }

    // priced before any field changes so an overflow leaves `log` untouched
    let pricing = match kind {
        ApprovalEventKind::Approved => match effective_rate(req.rate, log, req.default_currency) {
            Some((rate, currency)) => Some((rate, currency, price(log.duration, rate)?)),
            None => None,
        },
        ApprovalEventKind::Rejected => None,
    };

    log.status = req.target;
    log.approver_id = Some(req.approver_id);
    log.approval_comment = req.comment.clone();
    log.updated_at = req.at;
    log.is_paid = kind == ApprovalEventKind::Approved;
    log.paid_amount = None;

    match pricing {
        Some((rate, currency, amount)) => {
            log.hourly_rate = Some(rate);
            log.currency = Some(currency);
            log.paid_amount = Some(amount);
        }
        None if log.is_paid && req.rate.non_monetary => {
            log.hourly_rate = None;
            log.currency = None;
        }
        None => {}
    }

    Ok(ApprovalEvent {
        kind,
        time_log: log.clone(),
        approver_id: req.approver_id,
        owner_id: log.user_id,
    })
}

pub struct ApprovalEngine<'a, S: EventSink> {
    pool: &'a mut DbPool,
    sink: &'a S,
    default_currency: String,
}

impl<'a, S: EventSink> ApprovalEngine<'a, S> {
    pub fn new(pool: &'a mut DbPool, sink: &'a S, default_currency: &str) -> Self {
        Self {
            pool,
            sink,
            default_currency: default_currency.to_string(),
        }
    }

    pub fn approve(&mut self, id: i64, approver_id: i64, comment: Option<String>) -> AppResult<TimeLog> {
        self.transition(id, TimeLogStatus::Approved, approver_id, comment)
    }

    pub fn reject(&mut self, id: i64, approver_id: i64, comment: Option<String>) -> AppResult<TimeLog> {
        self.transition(id, TimeLogStatus::Rejected, approver_id, comment)
    }

    /// Move time log `id` out of pending. Exactly one event is published per
    /// successful call; failed calls publish nothing and change nothing.
    pub fn transition(
        &mut self,
        id: i64,
        target: TimeLogStatus,
        approver_id: i64,
        comment: Option<String>,
    ) -> AppResult<TimeLog> {
        let event = {
            let tx = self
                .pool
                .conn
                .transaction_with_behavior(TransactionBehavior::Immediate)?;

            let mut log = time_logs::get(&tx, id)?;
            let authorized = can_approve(&tx, approver_id, log.project_id)?;
            let rate = if target == TimeLogStatus::Approved {
                resolve_rate(&tx, log.project_id, log.user_id, &self.default_currency)?
            } else {
                ResolvedRate::default()
            };

            let event = apply_transition(
                &mut log,
                &TransitionRequest {
                    target,
                    approver_id,
                    comment,
                    authorized,
                    rate: &rate,
                    default_currency: &self.default_currency,
                    at: now(),
                },
            )?;

            if time_logs::persist_transition(&tx, &log)? == 0 {
                return Err(AppError::InvalidState(format!(
                    "time log #{id} is no longer pending"
                )));
            }

            ttlog(
                &tx,
                target.to_db_str(),
                &format!("time_log #{id}"),
                &format!("{} by user {}", target.to_db_str(), approver_id),
            )?;

            tx.commit()?;
            event
        };

        if let Err(e) = self.sink.publish(&self.pool.conn, &event) {
            warning(format!("Notification for time log #{id} not delivered: {e}"));
            let _ = ttlog(
                &self.pool.conn,
                "notify_failed",
                &format!("time_log #{id}"),
                &e.to_string(),
            );
        }

        Ok(event.time_log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time_log::NewTimeLog;
    use rust_decimal_macros::dec;

    fn pending_log() -> TimeLog {
        let new = NewTimeLog {
            user_id: 2,
            project_id: 1,
            duration: Some(dec!(2.0)),
            ..Default::default()
        };
        TimeLog::from_new(10, &new).unwrap()
    }

    fn usd50() -> ResolvedRate {
        ResolvedRate {
            hourly_rate: Some(dec!(50)),
            currency: Some("USD".into()),
            non_monetary: false,
        }
    }

    fn request(target: TimeLogStatus, authorized: bool, rate: &ResolvedRate) -> TransitionRequest<'_> {
        TransitionRequest {
            target,
            approver_id: 1,
            comment: None,
            authorized,
            rate,
            default_currency: "USD",
            at: now(),
        }
    }

    #[test]
    fn approval_marks_paid_and_prices_the_log() {
        let rate = usd50();
        let mut log = pending_log();
        let ev = apply_transition(&mut log, &request(TimeLogStatus::Approved, true, &rate)).unwrap();

        assert_eq!(log.status, TimeLogStatus::Approved);
        assert!(log.is_paid);
        assert_eq!(log.paid_amount, Some(dec!(100.00)));
        assert_eq!(log.currency.as_deref(), Some("USD"));
        assert_eq!(log.approver_id, Some(1));
        assert_eq!(ev.kind, ApprovalEventKind::Approved);
        assert_eq!(ev.owner_id, 2);
    }

    #[test]
    fn second_transition_is_invalid_state() {
        let rate = usd50();
        let mut log = pending_log();
        apply_transition(&mut log, &request(TimeLogStatus::Approved, true, &rate)).unwrap();

        let before = log.clone();
        let err = apply_transition(&mut log, &request(TimeLogStatus::Rejected, true, &rate)).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(log, before);

        let err = apply_transition(&mut log, &request(TimeLogStatus::Approved, true, &rate)).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[test]
    fn rejection_never_pays() {
        let rate = usd50();
        let mut log = pending_log();
        let mut req = request(TimeLogStatus::Rejected, true, &rate);
        req.comment = Some("wrong project".into());
        apply_transition(&mut log, &req).unwrap();

        assert_eq!(log.status, TimeLogStatus::Rejected);
        assert!(!log.is_paid);
        assert_eq!(log.paid_amount, None);
        assert_eq!(log.approval_comment.as_deref(), Some("wrong project"));
    }

    #[test]
    fn unauthorized_approver_leaves_log_untouched() {
        let rate = usd50();
        let mut log = pending_log();
        let before = log.clone();
        let err = apply_transition(&mut log, &request(TimeLogStatus::Approved, false, &rate)).unwrap_err();
        assert!(matches!(err, AppError::NotAuthorized(_)));
        assert_eq!(log, before);
    }

    #[test]
    fn pending_is_not_a_valid_target() {
        let rate = usd50();
        let mut log = pending_log();
        let err = apply_transition(&mut log, &request(TimeLogStatus::Pending, true, &rate)).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[test]
    fn overflowing_amount_fails_without_touching_the_log() {
        let rate = ResolvedRate {
            hourly_rate: Some(rust_decimal::Decimal::MAX),
            currency: Some("USD".into()),
            non_monetary: false,
        };
        let mut log = pending_log();
        let before = log.clone();
        let err = apply_transition(&mut log, &request(TimeLogStatus::Approved, true, &rate)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(log, before);
    }

    #[test]
    fn non_monetary_approval_has_no_amount() {
        let rate = ResolvedRate {
            hourly_rate: None,
            currency: None,
            non_monetary: true,
        };
        let mut log = pending_log();
        log.hourly_rate = Some(dec!(30));
        log.currency = Some("USD".into());
        apply_transition(&mut log, &request(TimeLogStatus::Approved, true, &rate)).unwrap();

        assert!(log.is_paid);
        assert_eq!(log.paid_amount, None);
        assert_eq!(log.hourly_rate, None);
    }

    #[test]
    fn stored_rate_prices_manual_entries_when_nothing_resolves() {
        let rate = ResolvedRate::default();
        let mut log = pending_log();
        log.hourly_rate = Some(dec!(35));
        log.currency = Some("EUR".into());
        apply_transition(&mut log, &request(TimeLogStatus::Approved, true, &rate)).unwrap();

        assert_eq!(log.paid_amount, Some(dec!(70.00)));
        assert_eq!(log.currency.as_deref(), Some("EUR"));
    }
}
