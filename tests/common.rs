#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rts() -> Command {
    cargo_bin_cmd!("rtimesheet")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimesheet.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Run `rtimesheet --db <db> <args…>` and expect success.
pub fn ok(db_path: &str, args: &[&str]) {
    rts().arg("--db").arg(db_path).args(args).assert().success();
}

/// Initialize the DB with one client and project #1 owned by user 1,
/// billed at 50 USD/h by default. User 2 is a member without override.
pub fn init_db_with_project(db_path: &str) {
    rts()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    ok(db_path, &["client", "Acme", "--email", "ops@acme.test"]);
    ok(
        db_path,
        &[
            "project", "Website", "--owner", "1", "--client", "1", "--rate", "50", "--currency",
            "usd",
        ],
    );
    ok(db_path, &["member", "--project", "1", "--user", "2"]);
}

/// Log `hours` for user 2 on project 1 with the given start date.
pub fn add_log(db_path: &str, day: &str, from: &str, to: &str, note: &str) {
    let start = format!("{day} {from}");
    let end = format!("{day} {to}");
    ok(
        db_path,
        &[
            "add", "--user", "2", "--project", "1", "--start", &start, "--end", &end, "--note",
            note,
        ],
    );
}
