//! Clients, tasks and invoices: plain CRUD used by the listing pages.

use crate::db::query::SqlQuery;
use crate::db::row::{get_date, get_datetime, get_decimal};
use crate::errors::{AppError, AppResult};
use crate::models::client::Client;
use crate::models::invoice::Invoice;
use crate::models::status::{InvoiceStatus, TaskStatus};
use crate::models::task::Task;
use crate::utils::time::{format_datetime, now};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use rust_decimal::Decimal;

fn bad_status(raw: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(AppError::InvalidStatus(raw)))
}

pub fn map_client(row: &Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: get_datetime(row, "created_at")?,
    })
}

pub fn map_task(row: &Row) -> rusqlite::Result<Task> {
    let raw: String = row.get("status")?;
    let status = TaskStatus::from_db_str(&raw).ok_or_else(|| bad_status(raw.clone()))?;
    Ok(Task {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        name: row.get("name")?,
        status,
        created_at: get_datetime(row, "created_at")?,
    })
}

pub fn map_invoice(row: &Row) -> rusqlite::Result<Invoice> {
    let raw: String = row.get("status")?;
    let status = InvoiceStatus::from_db_str(&raw).ok_or_else(|| bad_status(raw.clone()))?;
    Ok(Invoice {
        id: row.get("id")?,
        client_id: row.get("client_id")?,
        project_id: row.get("project_id")?,
        number: row.get("number")?,
        status,
        issue_date: get_date(row, "issue_date")?,
        total: get_decimal(row, "total")?,
        currency: row.get("currency")?,
        created_at: get_datetime(row, "created_at")?,
    })
}

/// Run any catalog query with the given row mapper.
pub fn list_with<T, F>(conn: &Connection, query: &SqlQuery, mapper: F) -> AppResult<Vec<T>>
where
    F: FnMut(&Row) -> rusqlite::Result<T>,
{
    let values = query.bind_values()?;
    let mut stmt = conn.prepare(&query.to_sql())?;
    let rows = stmt.query_map(params_from_iter(values), mapper)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_client(conn: &Connection, name: &str, email: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO clients (name, email, created_at) VALUES (?1, ?2, ?3)",
        params![name, email, format_datetime(&now())],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_task(conn: &Connection, project_id: i64, name: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO tasks (project_id, name, status, created_at) VALUES (?1, ?2, 'open', ?3)",
        params![project_id, name, format_datetime(&now())],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_task(conn: &Connection, id: i64) -> AppResult<Option<Task>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM tasks WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_task).optional()?)
}

pub fn set_task_status(conn: &Connection, id: i64, status: TaskStatus) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE tasks SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )?;
    if n == 0 {
        return Err(AppError::NotFound { entity: "task", id });
    }
    Ok(())
}

pub struct NewInvoice<'a> {
    pub client_id: i64,
    pub project_id: Option<i64>,
    pub number: &'a str,
    pub issue_date: NaiveDate,
    pub total: Decimal,
    pub currency: &'a str,
}

pub fn insert_invoice(conn: &Connection, inv: &NewInvoice) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO invoices (client_id, project_id, number, status, issue_date, total, currency, created_at)
         VALUES (?1, ?2, ?3, 'draft', ?4, ?5, ?6, ?7)",
        params![
            inv.client_id,
            inv.project_id,
            inv.number,
            inv.issue_date.format("%Y-%m-%d").to_string(),
            inv.total.to_string(),
            inv.currency,
            format_datetime(&now()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_invoice_status(conn: &Connection, id: i64, status: InvoiceStatus) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE invoices SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )?;
    if n == 0 {
        return Err(AppError::NotFound {
            entity: "invoice",
            id,
        });
    }
    Ok(())
}
