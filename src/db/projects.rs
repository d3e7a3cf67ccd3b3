//! Projects, per-project members, designated approvers and team relations.

use crate::db::query::SqlQuery;
use crate::db::row::{decimal_to_db, get_bool, get_datetime, get_opt_decimal};
use crate::errors::{AppError, AppResult};
use crate::models::project::{Project, ProjectMember};
use crate::models::rate::BillingTerms;
use crate::models::team::TeamAssignment;
use crate::utils::time::{format_datetime, now};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

fn map_billing(row: &Row) -> rusqlite::Result<BillingTerms> {
    Ok(BillingTerms {
        hourly_rate: get_opt_decimal(row, "hourly_rate")?,
        currency: row.get("currency")?,
        non_monetary: get_bool(row, "non_monetary")?,
    })
}

pub fn map_project(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        client_id: row.get("client_id")?,
        owner_id: row.get("owner_id")?,
        billing: map_billing(row)?,
        created_at: get_datetime(row, "created_at")?,
    })
}

pub fn insert_project(
    conn: &Connection,
    name: &str,
    client_id: Option<i64>,
    owner_id: i64,
    billing: &BillingTerms,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO projects (name, client_id, owner_id, hourly_rate, currency, non_monetary, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            name,
            client_id,
            owner_id,
            decimal_to_db(billing.hourly_rate),
            billing.currency,
            billing.non_monetary,
            format_datetime(&now()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_project(conn: &Connection, id: i64) -> AppResult<Option<Project>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM projects WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_project).optional()?)
}

pub fn get_project(conn: &Connection, id: i64) -> AppResult<Project> {
    find_project(conn, id)?.ok_or(AppError::NotFound {
        entity: "project",
        id,
    })
}

pub fn list_projects(conn: &Connection, query: &SqlQuery) -> AppResult<Vec<Project>> {
    let values = query.bind_values()?;
    let mut stmt = conn.prepare(&query.to_sql())?;
    let rows = stmt.query_map(params_from_iter(values), map_project)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert or replace the per-project assignment of `user_id`.
pub fn upsert_member(conn: &Connection, member: &ProjectMember) -> AppResult<()> {
    conn.execute(
        "INSERT INTO project_members (project_id, user_id, hourly_rate, currency, non_monetary)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(project_id, user_id) DO UPDATE SET
             hourly_rate = excluded.hourly_rate,
             currency = excluded.currency,
             non_monetary = excluded.non_monetary",
        params![
            member.project_id,
            member.user_id,
            decimal_to_db(member.billing.hourly_rate),
            member.billing.currency,
            member.billing.non_monetary,
        ],
    )?;
    Ok(())
}

pub fn find_member(
    conn: &Connection,
    project_id: i64,
    user_id: i64,
) -> AppResult<Option<ProjectMember>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM project_members WHERE project_id = ?1 AND user_id = ?2",
    )?;
    let member = stmt
        .query_row([project_id, user_id], |row| {
            Ok(ProjectMember {
                project_id: row.get("project_id")?,
                user_id: row.get("user_id")?,
                billing: map_billing(row)?,
            })
        })
        .optional()?;
    Ok(member)
}

pub fn add_approver(conn: &Connection, project_id: i64, user_id: i64) -> AppResult<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO project_approvers (project_id, user_id) VALUES (?1, ?2)",
        [project_id, user_id],
    )?;
    Ok(n > 0)
}

pub fn is_designated_approver(conn: &Connection, project_id: i64, user_id: i64) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM project_approvers WHERE project_id = ?1 AND user_id = ?2",
    )?;
    Ok(stmt.exists([project_id, user_id])?)
}

pub fn upsert_team_assignment(conn: &Connection, t: &TeamAssignment) -> AppResult<()> {
    conn.execute(
        "INSERT INTO team_assignments (leader_id, member_id, hourly_rate, currency, non_monetary, is_employee)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(leader_id, member_id) DO UPDATE SET
             hourly_rate = excluded.hourly_rate,
             currency = excluded.currency,
             non_monetary = excluded.non_monetary,
             is_employee = excluded.is_employee",
        params![
            t.leader_id,
            t.member_id,
            decimal_to_db(t.billing.hourly_rate),
            t.billing.currency,
            t.billing.non_monetary,
            t.is_employee,
        ],
    )?;
    Ok(())
}

pub fn find_team_assignment(
    conn: &Connection,
    leader_id: i64,
    member_id: i64,
) -> AppResult<Option<TeamAssignment>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM team_assignments WHERE leader_id = ?1 AND member_id = ?2",
    )?;
    let t = stmt
        .query_row([leader_id, member_id], |row| {
            Ok(TeamAssignment {
                leader_id: row.get("leader_id")?,
                member_id: row.get("member_id")?,
                billing: map_billing(row)?,
                is_employee: get_bool(row, "is_employee")?,
            })
        })
        .optional()?;
    Ok(t)
}
