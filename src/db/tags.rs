use crate::errors::AppResult;
use rusqlite::{Connection, OptionalExtension};

/// Return the id of tag `name`, creating it on first use.
pub fn ensure_tag(conn: &Connection, name: &str) -> AppResult<i64> {
    let name = name.trim();
    let existing: Option<i64> = conn
        .query_row("SELECT id FROM tags WHERE name = ?1", [name], |row| row.get(0))
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }
    conn.execute("INSERT INTO tags (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn attach(conn: &Connection, time_log_id: i64, tag_id: i64) -> AppResult<bool> {
    let n = conn.execute(
        "INSERT OR IGNORE INTO time_log_tags (time_log_id, tag_id) VALUES (?1, ?2)",
        [time_log_id, tag_id],
    )?;
    Ok(n > 0)
}

pub fn tags_for(conn: &Connection, time_log_id: i64) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT g.name FROM tags g
         JOIN time_log_tags tt ON tt.tag_id = g.id
         WHERE tt.time_log_id = ?1
         ORDER BY g.name ASC",
    )?;
    let rows = stmt.query_map([time_log_id], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
