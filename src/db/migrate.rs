use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists: it records applied migrations too.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260105_0001_initial_schema",
        description: "Created clients, projects, teams, tasks and time_logs tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS clients (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS projects (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL,
            client_id     INTEGER REFERENCES clients(id),
            owner_id      INTEGER NOT NULL,
            hourly_rate   TEXT,
            currency      TEXT,
            non_monetary  INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS project_members (
            project_id    INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            user_id       INTEGER NOT NULL,
            hourly_rate   TEXT,
            currency      TEXT,
            non_monetary  INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (project_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS project_approvers (
            project_id  INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            user_id     INTEGER NOT NULL,
            PRIMARY KEY (project_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS team_assignments (
            leader_id     INTEGER NOT NULL,
            member_id     INTEGER NOT NULL,
            hourly_rate   TEXT,
            currency      TEXT,
            non_monetary  INTEGER NOT NULL DEFAULT 0,
            is_employee   INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (leader_id, member_id)
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id  INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            name        TEXT NOT NULL,
            status      TEXT NOT NULL DEFAULT 'open' CHECK(status IN ('open','done')),
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS time_logs (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id           INTEGER NOT NULL,
            project_id        INTEGER NOT NULL REFERENCES projects(id),
            task_id           INTEGER REFERENCES tasks(id),
            start_at          TEXT,
            end_at            TEXT,
            duration          TEXT NOT NULL,
            is_paid           INTEGER NOT NULL DEFAULT 0,
            non_billable      INTEGER NOT NULL DEFAULT 0,
            hourly_rate       TEXT,
            currency          TEXT,
            status            TEXT NOT NULL DEFAULT 'pending'
                              CHECK(status IN ('pending','approved','rejected')),
            note              TEXT NOT NULL DEFAULT '',
            approver_id       INTEGER,
            approval_comment  TEXT,
            paid_amount       TEXT,
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL,
            CHECK (is_paid = 0 OR status = 'approved')
        );

        CREATE INDEX IF NOT EXISTS idx_time_logs_project ON time_logs(project_id, status);
        CREATE INDEX IF NOT EXISTS idx_time_logs_user ON time_logs(user_id, created_at);
        "#,
    },
    Migration {
        version: "20260112_0002_tags_and_invoices",
        description: "Added tags, time_log_tags and invoices tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS tags (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS time_log_tags (
            time_log_id  INTEGER NOT NULL REFERENCES time_logs(id) ON DELETE CASCADE,
            tag_id       INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (time_log_id, tag_id)
        );

        CREATE TABLE IF NOT EXISTS invoices (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id   INTEGER NOT NULL REFERENCES clients(id),
            project_id  INTEGER REFERENCES projects(id),
            number      TEXT NOT NULL UNIQUE,
            status      TEXT NOT NULL DEFAULT 'draft' CHECK(status IN ('draft','sent','paid')),
            issue_date  TEXT NOT NULL,
            total       TEXT NOT NULL,
            currency    TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20260120_0003_notifications",
        description: "Added notifications channel table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            recipient_id  INTEGER NOT NULL,
            kind          TEXT NOT NULL,
            payload       TEXT NOT NULL,
            created_at    TEXT NOT NULL,
            read_at       TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_notifications_recipient
            ON notifications(recipient_id, read_at);
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    conn.execute_batch("BEGIN;")?;

    let outcome = conn.execute_batch(m.sql).and_then(|_| {
        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [m.version, m.description],
        )
    });

    match outcome {
        Ok(_) => {
            conn.execute_batch("COMMIT;")?;
            Ok(())
        }
        Err(e) => {
            conn.execute_batch("ROLLBACK;")?;
            Err(e)
        }
    }
}

/// Versions already recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> Result<Vec<String>> {
    ensure_log_table(conn)?;
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        success(format!("Migration applied: {} → {}", m.version, m.description));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        let versions = applied_versions(&conn).unwrap();
        assert_eq!(versions.len(), MIGRATIONS.len());
        assert_eq!(versions[0], "20260105_0001_initial_schema");
    }

    #[test]
    fn paid_flag_requires_approved_status() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO projects (name, owner_id, created_at) VALUES ('p', 1, '2026-01-01 00:00:00')",
            [],
        )
        .unwrap();

        let res = conn.execute(
            "INSERT INTO time_logs (user_id, project_id, duration, is_paid, status, created_at, updated_at)
             VALUES (2, 1, '1.00', 1, 'pending', '2026-01-01 00:00:00', '2026-01-01 00:00:00')",
            [],
        );
        assert!(res.is_err());
    }
}
