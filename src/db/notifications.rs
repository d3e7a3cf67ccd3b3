//! Per-user notification channel stored in SQLite.

use crate::core::events::EventSink;
use crate::db::row::{get_datetime, get_opt_datetime};
use crate::errors::{AppError, AppResult};
use crate::models::approval_event::ApprovalEvent;
use crate::models::notification::Notification;
use crate::utils::time::{format_datetime, now};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use serde_json::json;

/// Delivers approval events to the owner of the time log.
pub struct SqliteNotifier;

impl EventSink for SqliteNotifier {
    fn publish(&self, conn: &Connection, event: &ApprovalEvent) -> AppResult<()> {
        let log = &event.time_log;
        let payload = json!({
            "time_log_id": log.id,
            "project_id": log.project_id,
            "status": log.status.to_db_str(),
            "approver_id": event.approver_id,
            "comment": log.approval_comment,
            "duration": log.duration,
            "paid_amount": log.paid_amount,
            "currency": log.currency,
        });

        insert(conn, event.owner_id, event.kind.as_str(), &payload)?;
        Ok(())
    }
}

pub fn insert(
    conn: &Connection,
    recipient_id: i64,
    kind: &str,
    payload: &serde_json::Value,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO notifications (recipient_id, kind, payload, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            recipient_id,
            kind,
            serde_json::to_string(payload)?,
            format_datetime(&now()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn map_notification(row: &Row) -> rusqlite::Result<Notification> {
    let raw: String = row.get("payload")?;
    let payload = serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    Ok(Notification {
        id: row.get("id")?,
        recipient_id: row.get("recipient_id")?,
        kind: row.get("kind")?,
        payload,
        created_at: get_datetime(row, "created_at")?,
        read_at: get_opt_datetime(row, "read_at")?,
    })
}

pub fn list_for_user(conn: &Connection, user_id: i64, unread_only: bool) -> AppResult<Vec<Notification>> {
    let sql = if unread_only {
        "SELECT * FROM notifications WHERE recipient_id = ?1 AND read_at IS NULL ORDER BY id ASC"
    } else {
        "SELECT * FROM notifications WHERE recipient_id = ?1 ORDER BY id ASC"
    };
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map([user_id], map_notification)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Mark one notification of `user_id` as read.
pub fn mark_read(conn: &Connection, user_id: i64, id: i64) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE notifications SET read_at = ?1
         WHERE id = ?2 AND recipient_id = ?3 AND read_at IS NULL",
        params![format_datetime(&now()), id, user_id],
    )?;
    if n == 0 {
        return Err(AppError::NotFound {
            entity: "unread notification",
            id,
        });
    }
    Ok(())
}

/// Mark every unread notification of `user_id` as read; returns how many.
pub fn mark_all_read(conn: &Connection, user_id: i64) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE notifications SET read_at = ?1 WHERE recipient_id = ?2 AND read_at IS NULL",
        params![format_datetime(&now()), user_id],
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        conn
    }

    #[test]
    fn notifications_are_scoped_to_recipient() {
        let conn = conn();
        insert(&conn, 2, "time_log_approved", &json!({"time_log_id": 1})).unwrap();
        insert(&conn, 3, "time_log_rejected", &json!({"time_log_id": 2})).unwrap();

        let mine = list_for_user(&conn, 2, false).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].kind, "time_log_approved");
        assert_eq!(mine[0].payload["time_log_id"], 1);
    }

    #[test]
    fn read_notifications_leave_the_unread_list() {
        let conn = conn();
        let id = insert(&conn, 2, "time_log_approved", &json!({})).unwrap();
        insert(&conn, 2, "time_log_rejected", &json!({})).unwrap();

        mark_read(&conn, 2, id).unwrap();
        assert_eq!(list_for_user(&conn, 2, true).unwrap().len(), 1);
        assert!(mark_read(&conn, 2, id).is_err());
        assert!(mark_read(&conn, 3, id + 1).is_err());

        assert_eq!(mark_all_read(&conn, 2).unwrap(), 1);
        assert!(list_for_user(&conn, 2, true).unwrap().is_empty());
        assert_eq!(list_for_user(&conn, 2, false).unwrap().len(), 2);
    }
}
