use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// ISO (year, week) key; weeks that straddle a year boundary share one key.
pub fn iso_week_key(d: NaiveDate) -> (i32, u32) {
    let w = d.iso_week();
    (w.year(), w.week())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_week_spans_year_boundary() {
        let dec31 = parse_date("2024-12-31").unwrap();
        let jan1 = parse_date("2025-01-01").unwrap();
        assert_eq!(iso_week_key(dec31), iso_week_key(jan1));
        assert_eq!(iso_week_key(jan1), (2025, 1));
    }
}
