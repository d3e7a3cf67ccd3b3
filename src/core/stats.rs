use crate::core::filter::{FilterParams, Resource};
use crate::db::time_logs;
use crate::errors::AppResult;
use crate::models::stats::TimeLogStats;
use crate::models::time_log::TimeLog;
use crate::utils::date::iso_week_key;
use crate::utils::money::{accumulate, round2};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

fn add_to(map: &mut BTreeMap<String, Decimal>, currency: String, amount: Decimal) -> AppResult<()> {
    accumulate(map.entry(currency).or_insert(Decimal::ZERO), amount)
}

/// Fold an already-scoped collection of logs into reporting aggregates.
///
/// Hours: unpaid = not paid and billable; unbillable = non-billable whatever
/// the payment state; paid = is_paid. Amounts are grouped per currency and
/// never converted. Paid logs count their `paid_amount` when set, otherwise
/// duration × stored rate; unpaid non-billable logs add no amount. Sums
/// that leave the decimal range are a validation error.
pub fn compute_stats<'a, I>(logs: I) -> AppResult<TimeLogStats>
where
    I: IntoIterator<Item = &'a TimeLog>,
{
    let mut stats = TimeLogStats::default();
    let mut weeks = HashSet::new();

    for log in logs {
        stats.count += 1;
        accumulate(&mut stats.total_duration, log.duration)?;
        weeks.insert(iso_week_key(log.work_date()));

        if log.non_billable {
            accumulate(&mut stats.unbillable_hours, log.duration)?;
        }

        if log.is_paid {
            accumulate(&mut stats.paid_hours, log.duration)?;
            let amount = match (&log.paid_amount, &log.currency) {
                (Some(paid), Some(cur)) => Some((cur.clone(), *paid)),
                _ => log.billable_amount()?,
            };
            if let Some((cur, value)) = amount {
                add_to(&mut stats.paid_amounts_by_currency, cur, value)?;
            }
        } else if !log.non_billable {
            accumulate(&mut stats.unpaid_hours, log.duration)?;
            if let Some((cur, value)) = log.billable_amount()? {
                add_to(&mut stats.unpaid_amounts_by_currency, cur, value)?;
            }
        }
    }

    stats.weeks = weeks.len();
    let divisor = Decimal::from(stats.weeks.max(1) as u64);
    stats.weekly_average = round2(stats.total_duration / divisor);

    Ok(stats)
}

/// Scope the time logs with `params`, then fold them.
pub fn stats_for(conn: &Connection, params: &FilterParams) -> AppResult<TimeLogStats> {
    let logs = time_logs::list(conn, &Resource::TimeLogs.query(params))?;
    compute_stats(&logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::status::TimeLogStatus;
    use crate::models::time_log::NewTimeLog;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn log_at(start: &str, hours: Decimal) -> TimeLog {
        let start = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M").unwrap();
        let new = NewTimeLog {
            user_id: 1,
            project_id: 1,
            duration: Some(hours),
            ..Default::default()
        };
        let mut log = TimeLog::from_new(0, &new).unwrap();
        log.start = Some(start);
        log
    }

    fn priced(mut log: TimeLog, rate: Decimal, cur: &str) -> TimeLog {
        log.hourly_rate = Some(rate);
        log.currency = Some(cur.into());
        log
    }

    fn paid(mut log: TimeLog) -> TimeLog {
        log.status = TimeLogStatus::Approved;
        log.is_paid = true;
        log.paid_amount = log.billable_amount().unwrap().map(|(_, a)| a);
        log
    }

    fn sample() -> Vec<TimeLog> {
        let mut unbillable = log_at("2025-03-05 09:00", dec!(1.5));
        unbillable.non_billable = true;
        vec![
            priced(log_at("2025-03-03 09:00", dec!(2)), dec!(50), "USD"),
            paid(priced(log_at("2025-03-04 09:00", dec!(3)), dec!(40), "EUR")),
            unbillable,
            priced(log_at("2025-03-12 09:00", dec!(4)), dec!(50), "USD"),
            log_at("2025-03-13 09:00", dec!(0.5)),
        ]
    }

    #[test]
    fn empty_input_is_all_zero() {
        let empty: Vec<TimeLog> = Vec::new();
        let stats = compute_stats(&empty).unwrap();
        assert_eq!(stats.total_duration, Decimal::ZERO);
        assert_eq!(stats.unpaid_hours, Decimal::ZERO);
        assert_eq!(stats.unbillable_hours, Decimal::ZERO);
        assert_eq!(stats.paid_hours, Decimal::ZERO);
        assert_eq!(stats.weekly_average, Decimal::ZERO);
        assert!(stats.paid_amounts_by_currency.is_empty());
        assert!(stats.unpaid_amounts_by_currency.is_empty());
    }

    #[test]
    fn hours_are_split_by_payment_and_billing() {
        let stats = compute_stats(&sample()).unwrap();
        assert_eq!(stats.total_duration, dec!(11));
        assert_eq!(stats.paid_hours, dec!(3));
        assert_eq!(stats.unbillable_hours, dec!(1.5));
        assert_eq!(stats.unpaid_hours, dec!(6.5));
    }

    #[test]
    fn amounts_are_grouped_per_currency() {
        let stats = compute_stats(&sample()).unwrap();
        assert_eq!(stats.unpaid_amounts_by_currency.get("USD"), Some(&dec!(300)));
        assert_eq!(stats.paid_amounts_by_currency.get("EUR"), Some(&dec!(120)));
        assert!(!stats.paid_amounts_by_currency.contains_key("USD"));
        assert!(!stats.unpaid_amounts_by_currency.contains_key("EUR"));
    }

    #[test]
    fn weekly_average_uses_distinct_iso_weeks() {
        let stats = compute_stats(&sample()).unwrap();
        assert_eq!(stats.weeks, 2);
        assert_eq!(stats.weekly_average, dec!(5.50));
    }

    #[test]
    fn order_does_not_matter() {
        let logs = sample();
        let mut reversed = logs.clone();
        reversed.reverse();
        let mut rotated = logs.clone();
        rotated.rotate_left(2);

        let a = compute_stats(&logs).unwrap();
        assert_eq!(a, compute_stats(&reversed).unwrap());
        assert_eq!(a, compute_stats(&rotated).unwrap());
    }

    #[test]
    fn paid_non_billable_counts_both_ways() {
        let mut log = paid(priced(log_at("2025-03-03 09:00", dec!(2)), dec!(10), "USD"));
        log.non_billable = true;
        let stats = compute_stats(&[log]).unwrap();
        assert_eq!(stats.paid_hours, dec!(2));
        assert_eq!(stats.unbillable_hours, dec!(2));
        assert_eq!(stats.unpaid_hours, Decimal::ZERO);
    }

    #[test]
    fn amount_overflow_is_reported() {
        let huge = Decimal::MAX / dec!(2);
        let logs = vec![
            paid(priced(log_at("2025-03-03 09:00", dec!(1)), huge, "USD")),
            paid(priced(log_at("2025-03-04 09:00", dec!(1)), huge, "USD")),
            paid(priced(log_at("2025-03-05 09:00", dec!(1)), huge, "USD")),
        ];
        assert!(matches!(compute_stats(&logs), Err(AppError::Validation(_))));
    }
}
