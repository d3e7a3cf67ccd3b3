/// ANSI color helper utilities for terminal output.
use crate::models::status::TimeLogStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// pending → yellow, approved → green, rejected → red
pub fn color_for_status(status: TimeLogStatus) -> &'static str {
    match status {
        TimeLogStatus::Pending => YELLOW,
        TimeLogStatus::Approved => GREEN,
        TimeLogStatus::Rejected => RED,
    }
}

/// Returns formatted value in grey when empty ("" or "--").
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
