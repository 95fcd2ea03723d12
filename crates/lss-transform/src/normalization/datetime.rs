//! Lenient date parsing.
//!
//! Accepts the shapes date strings commonly take in spreadsheet data:
//! ISO 8601 dates and datetimes (with or without offset), slash-separated
//! dates and spelled-out month names.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%a %b %d %Y",
    "%A, %B %d, %Y",
];

/// Parse a date or datetime string. Returns None when no known shape matches.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(parse_date("2024-01-05").map(|d| d.date()), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_iso_datetime_with_offset() {
        let parsed = parse_date("2024-03-10T08:30:00+02:00").unwrap();
        assert_eq!(parsed.date(), ymd(2024, 3, 10));
    }

    #[test]
    fn test_us_slash_date() {
        assert_eq!(parse_date("1/5/2024").map(|d| d.date()), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(
            parse_date("January 5, 2024").map(|d| d.date()),
            Some(ymd(2024, 1, 5))
        );
        assert_eq!(parse_date("5 Jan 2024").map(|d| d.date()), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_rejects_text() {
        assert!(parse_date("hello").is_none());
        assert!(parse_date("").is_none());
        assert!(parse_date("2024-13-40").is_none());
    }
}
