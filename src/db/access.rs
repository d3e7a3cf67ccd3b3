//! Authorization lookups backed by the project tables.

use crate::db::projects::{get_project, is_designated_approver};
use crate::errors::AppResult;
use rusqlite::Connection;

/// May `user_id` approve or reject time logs of `project_id`?
/// True for the project owner and for designated approvers.
pub fn can_approve(conn: &Connection, user_id: i64, project_id: i64) -> AppResult<bool> {
    let project = get_project(conn, project_id)?;
    if project.owner_id == user_id {
        return Ok(true);
    }
    is_designated_approver(conn, project_id, user_id)
}
