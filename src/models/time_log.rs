use super::status::TimeLogStatus;
use crate::errors::{AppError, AppResult};
use crate::utils::money::{price, round2};
use chrono::{Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeLog {
    pub id: i64,
    pub user_id: i64,                   // ⇔ time_logs.user_id (owner)
    pub project_id: i64,                // ⇔ time_logs.project_id
    pub task_id: Option<i64>,           // ⇔ time_logs.task_id
    pub start: Option<NaiveDateTime>,   // ⇔ time_logs.start_at (TEXT "YYYY-MM-DD HH:MM:SS")
    pub end: Option<NaiveDateTime>,     // ⇔ time_logs.end_at
    pub duration: Decimal,              // hours, 2 dp
    pub is_paid: bool,                  // only ever set by approval
    pub non_billable: bool,
    pub hourly_rate: Option<Decimal>,
    pub currency: Option<String>,
    pub status: TimeLogStatus,
    pub note: String,
    pub approver_id: Option<i64>,
    pub approval_comment: Option<String>,
    pub paid_amount: Option<Decimal>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input for a brand new time log. Status, payment and approval fields are
/// not settable: every new log starts pending and unpaid.
#[derive(Debug, Clone, Default)]
pub struct NewTimeLog {
    pub user_id: i64,
    pub project_id: i64,
    pub task_id: Option<i64>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub duration: Option<Decimal>,
    pub non_billable: bool,
    pub note: String,
    /// Manual rate, used only when no assignment resolves one.
    pub hourly_rate: Option<Decimal>,
    pub currency: Option<String>,
}

impl NewTimeLog {
    /// Resolve the duration of the new log: computed from the interval when
    /// both timestamps are present, otherwise the manual value.
    pub fn resolved_duration(&self) -> AppResult<Decimal> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => duration_between(start, end),
            (Some(_), None) | (None, Some(_)) => Err(AppError::Validation(
                "start and end must be given together".into(),
            )),
            (None, None) => {
                let d = self.duration.ok_or_else(|| {
                    AppError::Validation("either --start/--end or --hours is required".into())
                })?;
                checked_duration(d)
            }
        }
    }
}

/// Longest single entry, in hours.
pub const MAX_ENTRY_HOURS: i64 = 24;

/// A manual or computed duration: positive, at most `MAX_ENTRY_HOURS`,
/// rounded to 2 decimals.
pub fn checked_duration(d: Decimal) -> AppResult<Decimal> {
    if d <= Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "duration must be positive, got {d}"
        )));
    }
    if d > Decimal::from(MAX_ENTRY_HOURS) {
        return Err(AppError::Validation(format!(
            "a single entry cannot exceed {MAX_ENTRY_HOURS}h, got {d}"
        )));
    }
    Ok(round2(d))
}

/// Elapsed hours between two timestamps, rounded to 2 decimals.
pub fn duration_between(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<Decimal> {
    if end <= start {
        return Err(AppError::Validation(format!(
            "end ({end}) must be later than start ({start})"
        )));
    }
    let secs = (end - start).num_seconds();
    checked_duration(Decimal::from(secs) / Decimal::from(3600))
}

impl TimeLog {
    /// Materialize a pending log from creation input.
    pub fn from_new(id: i64, new: &NewTimeLog) -> AppResult<Self> {
        let duration = new.resolved_duration()?;
        let now = Local::now().naive_local();
        Ok(Self {
            id,
            user_id: new.user_id,
            project_id: new.project_id,
            task_id: new.task_id,
            start: new.start,
            end: new.end,
            duration,
            is_paid: false,
            non_billable: new.non_billable,
            hourly_rate: new.hourly_rate,
            currency: new.currency.clone(),
            status: TimeLogStatus::Pending,
            note: new.note.clone(),
            approver_id: None,
            approval_comment: None,
            paid_amount: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Day the work is attributed to: the start timestamp when known,
    /// otherwise the creation day (manual entries).
    pub fn work_date(&self) -> NaiveDate {
        self.start.unwrap_or(self.created_at).date()
    }

    /// duration × stored rate, when the log carries both a rate and a currency.
    pub fn billable_amount(&self) -> AppResult<Option<(String, Decimal)>> {
        match (&self.hourly_rate, &self.currency) {
            (Some(rate), Some(cur)) => Ok(Some((cur.clone(), price(self.duration, *rate)?))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn duration_is_rounded_to_two_decimals() {
        let d = duration_between(ts("2025-03-03 09:00"), ts("2025-03-03 09:20")).unwrap();
        assert_eq!(d, dec!(0.33));

        let d = duration_between(ts("2025-03-03 09:00"), ts("2025-03-03 11:30")).unwrap();
        assert_eq!(d, dec!(2.50));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = duration_between(ts("2025-03-03 10:00"), ts("2025-03-03 09:00")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn manual_duration_without_timestamps() {
        let new = NewTimeLog {
            user_id: 1,
            project_id: 1,
            duration: Some(dec!(1.255)),
            ..Default::default()
        };
        assert_eq!(new.resolved_duration().unwrap(), dec!(1.26));
    }

    #[test]
    fn entries_are_capped_at_one_day() {
        let huge = NewTimeLog {
            duration: Some(dec!(10000000000000000000000000000)),
            ..Default::default()
        };
        assert!(matches!(huge.resolved_duration(), Err(AppError::Validation(_))));

        let full_day = NewTimeLog {
            duration: Some(dec!(24)),
            ..Default::default()
        };
        assert_eq!(full_day.resolved_duration().unwrap(), dec!(24));

        assert!(duration_between(ts("2025-03-03 00:00"), ts("2025-03-04 00:00")).is_ok());
        assert!(duration_between(ts("2025-03-03 09:00"), ts("2025-03-04 09:01")).is_err());
    }

    #[test]
    fn billable_amount_overflow_is_an_error() {
        let mut log = TimeLog::from_new(1, &NewTimeLog {
            duration: Some(dec!(2)),
            ..Default::default()
        })
        .unwrap();
        log.hourly_rate = Some(Decimal::MAX);
        log.currency = Some("USD".into());
        assert!(log.billable_amount().is_err());

        log.hourly_rate = Some(dec!(50));
        assert_eq!(log.billable_amount().unwrap(), Some(("USD".into(), dec!(100))));
    }

    #[test]
    fn half_interval_is_rejected() {
        let new = NewTimeLog {
            start: Some(ts("2025-03-03 09:00")),
            ..Default::default()
        };
        assert!(new.resolved_duration().is_err());
    }

    #[test]
    fn new_logs_start_pending_and_unpaid() {
        let new = NewTimeLog {
            user_id: 7,
            project_id: 3,
            duration: Some(dec!(2)),
            ..Default::default()
        };
        let log = TimeLog::from_new(0, &new).unwrap();
        assert_eq!(log.status, TimeLogStatus::Pending);
        assert!(!log.is_paid);
        assert!(log.paid_amount.is_none());
        assert_eq!(log.work_date(), log.created_at.date());
    }
}
