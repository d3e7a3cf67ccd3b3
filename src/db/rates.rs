//! Rate resolution backed by project, member and team tables.

use crate::core::rates::resolve;
use crate::db::projects::{find_member, find_team_assignment, get_project};
use crate::errors::AppResult;
use crate::models::rate::ResolvedRate;
use rusqlite::Connection;

/// Applicable billing terms for `user_id` on `project_id`: the per-project
/// assignment first, then the owner's team relation, then project defaults.
pub fn resolve_rate(
    conn: &Connection,
    project_id: i64,
    user_id: i64,
    default_currency: &str,
) -> AppResult<ResolvedRate> {
    let project = get_project(conn, project_id)?;
    let member = find_member(conn, project_id, user_id)?;
    let team = find_team_assignment(conn, project.owner_id, user_id)?;

    Ok(resolve(
        [
            member.as_ref().map(|m| &m.billing),
            team.as_ref().map(|t| &t.billing),
            Some(&project.billing),
        ],
        default_currency,
    ))
}
