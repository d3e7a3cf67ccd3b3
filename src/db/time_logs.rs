use crate::db::query::SqlQuery;
use crate::db::row::{
    decimal_to_db, get_bool, get_datetime, get_decimal, get_opt_datetime, get_opt_decimal,
};
use crate::errors::{AppError, AppResult};
use crate::models::status::TimeLogStatus;
use crate::models::time_log::TimeLog;
use crate::utils::time::format_datetime;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

pub fn map_row(row: &Row) -> rusqlite::Result<TimeLog> {
    let status_str: String = row.get("status")?;
    let status = TimeLogStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidStatus(status_str.clone())),
        )
    })?;

    Ok(TimeLog {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        project_id: row.get("project_id")?,
        task_id: row.get("task_id")?,
        start: get_opt_datetime(row, "start_at")?,
        end: get_opt_datetime(row, "end_at")?,
        duration: get_decimal(row, "duration")?,
        is_paid: get_bool(row, "is_paid")?,
        non_billable: get_bool(row, "non_billable")?,
        hourly_rate: get_opt_decimal(row, "hourly_rate")?,
        currency: row.get("currency")?,
        status,
        note: row.get("note")?,
        approver_id: row.get("approver_id")?,
        approval_comment: row.get("approval_comment")?,
        paid_amount: get_opt_decimal(row, "paid_amount")?,
        created_at: get_datetime(row, "created_at")?,
        updated_at: get_datetime(row, "updated_at")?,
    })
}

/// Insert a new log and return its id. Status and payment columns take the
/// values carried by `log` (pending/unpaid for every caller in this crate).
pub fn insert(conn: &Connection, log: &TimeLog) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO time_logs (user_id, project_id, task_id, start_at, end_at, duration,
                                is_paid, non_billable, hourly_rate, currency, status, note,
                                approver_id, approval_comment, paid_amount, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            log.user_id,
            log.project_id,
            log.task_id,
            log.start.as_ref().map(format_datetime),
            log.end.as_ref().map(format_datetime),
            log.duration.to_string(),
            log.is_paid,
            log.non_billable,
            decimal_to_db(log.hourly_rate),
            log.currency,
            log.status.to_db_str(),
            log.note,
            log.approver_id,
            log.approval_comment,
            decimal_to_db(log.paid_amount),
            format_datetime(&log.created_at),
            format_datetime(&log.updated_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find(conn: &Connection, id: i64) -> AppResult<Option<TimeLog>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM time_logs WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<TimeLog> {
    find(conn, id)?.ok_or(AppError::NotFound {
        entity: "time log",
        id,
    })
}

/// Update the owner-editable fields (interval, duration, note, billing flag).
pub fn update_details(conn: &Connection, log: &TimeLog) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE time_logs
         SET task_id = ?1, start_at = ?2, end_at = ?3, duration = ?4,
             non_billable = ?5, note = ?6, updated_at = ?7
         WHERE id = ?8 AND is_paid = 0",
        params![
            log.task_id,
            log.start.as_ref().map(format_datetime),
            log.end.as_ref().map(format_datetime),
            log.duration.to_string(),
            log.non_billable,
            log.note,
            format_datetime(&log.updated_at),
            log.id,
        ],
    )?;
    Ok(n)
}

/// Persist the outcome of a status transition. The `status = 'pending'`
/// guard makes a concurrent second transition update zero rows.
pub fn persist_transition(conn: &Connection, log: &TimeLog) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE time_logs
         SET status = ?1, is_paid = ?2, approver_id = ?3, approval_comment = ?4,
             hourly_rate = ?5, currency = ?6, paid_amount = ?7, updated_at = ?8
         WHERE id = ?9 AND status = 'pending'",
        params![
            log.status.to_db_str(),
            log.is_paid,
            log.approver_id,
            log.approval_comment,
            decimal_to_db(log.hourly_rate),
            log.currency,
            decimal_to_db(log.paid_amount),
            format_datetime(&log.updated_at),
            log.id,
        ],
    )?;
    Ok(n)
}

pub fn delete_unpaid(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM time_logs WHERE id = ?1 AND is_paid = 0",
        [id],
    )?)
}

/// Run a (filtered) time-log query and materialize the rows.
pub fn list(conn: &Connection, query: &SqlQuery) -> AppResult<Vec<TimeLog>> {
    let values = query.bind_values()?;
    let mut stmt = conn.prepare(&query.to_sql())?;
    let rows = stmt.query_map(params_from_iter(values), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
