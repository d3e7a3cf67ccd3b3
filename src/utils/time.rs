//! Time utilities: parsing and formatting timestamps as stored in SQLite.

use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDateTime};

/// Storage format for every timestamp column; `date(col)` works on it.
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

const INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn parse_optional_datetime(input: Option<&String>) -> AppResult<Option<NaiveDateTime>> {
    if let Some(s) = input {
        let t = parse_datetime(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))?;
        Ok(Some(t))
    } else {
        Ok(None)
    }
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse a stored timestamp, tolerating the RFC 3339 form written by older rows.
pub fn parse_db_datetime(s: &str) -> Option<NaiveDateTime> {
    parse_datetime(s).or_else(|| {
        chrono::DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.naive_local())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minutes_and_iso_t() {
        assert!(parse_datetime("2025-03-03 09:15").is_some());
        assert!(parse_datetime("2025-03-03T09:15:30").is_some());
        assert!(parse_datetime("03/03/2025").is_none());
    }

    #[test]
    fn storage_format_roundtrips() {
        let dt = parse_datetime("2025-03-03 09:15").unwrap();
        assert_eq!(format_datetime(&dt), "2025-03-03 09:15:00");
        assert_eq!(parse_db_datetime("2025-03-03 09:15:00"), Some(dt));
    }
}
