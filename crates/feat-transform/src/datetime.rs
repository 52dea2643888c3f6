//! Timestamp parsing for date-like text columns.
//!
//! Both the categorical encoder (to exclude date-like columns) and the
//! temporal extractor (to expand them) use [`parse_timestamp`], so a column
//! is either encoded or expanded, never both.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a date or datetime string into a naive local timestamp.
///
/// Date-only values land at midnight. Values with an explicit UTC offset keep
/// their wall-clock time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    try_parse_datetime(trimmed).or_else(|| try_parse_date(trimmed).map(|d| d.and_time(NaiveTime::MIN)))
}

/// Returns true if at least one value is present and every present value
/// parses as a timestamp.
pub fn all_timestamps(values: &[Option<String>]) -> bool {
    let mut seen = false;
    for value in values.iter().flatten() {
        if parse_timestamp(value).is_none() {
            return false;
        }
        seen = true;
    }
    seen
}

/// Try to parse full datetime formats.
fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%d-%b-%Y %H:%M:%S", // 15-Jan-2024 10:30:00
        "%m/%d/%Y %H:%M:%S", // US
        "%m/%d/%Y %H:%M",
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Try to parse date-only formats.
fn try_parse_date(value: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d-%b-%Y",  // 15-Jan-2024
        "%d-%B-%Y",  // 15-January-2024
        "%m/%d/%Y",  // US: 01/15/2024
        "%d.%m.%Y",  // 15.01.2024
        "%b %d, %Y", // Jan 15, 2024
        "%B %d, %Y", // January 15, 2024
        "%d %b %Y",  // 15 Jan 2024
        "%d %B %Y",  // 15 January 2024
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_only() {
        assert_eq!(
            parse_timestamp("2024-03-15"),
            Some(ymd(2024, 3, 15).and_time(NaiveTime::MIN))
        );
        assert_eq!(
            parse_timestamp("03/15/2024").map(|dt| dt.date()),
            Some(ymd(2024, 3, 15))
        );
        assert_eq!(
            parse_timestamp("15-Mar-2024").map(|dt| dt.date()),
            Some(ymd(2024, 3, 15))
        );
    }

    #[test]
    fn test_parse_datetime() {
        let parsed = parse_timestamp("2024-03-15 13:45:00").unwrap();
        assert_eq!(parsed.date(), ymd(2024, 3, 15));
        assert_eq!(parsed.time(), NaiveTime::from_hms_opt(13, 45, 0).unwrap());

        let with_offset = parse_timestamp("2024-03-15T23:30:00+02:00").unwrap();
        assert_eq!(with_offset.date(), ymd(2024, 3, 15));
    }

    #[test]
    fn test_parse_rejects_text() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("Male").is_none());
        assert!(parse_timestamp("2024-13-01").is_none());
        assert!(parse_timestamp("42").is_none());
    }

    #[test]
    fn test_all_timestamps() {
        let dates = vec![Some("2024-01-01".to_string()), None, Some("2024-02-01".to_string())];
        assert!(all_timestamps(&dates));

        let mixed = vec![Some("2024-01-01".to_string()), Some("soon".to_string())];
        assert!(!all_timestamps(&mixed));

        let empty: Vec<Option<String>> = vec![None, None];
        assert!(!all_timestamps(&empty));
    }
}
