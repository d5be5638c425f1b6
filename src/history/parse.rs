//! Date parsing for registration records and archive timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Attempts to parse a registry date string in the formats registries emit.
///
/// Offsets are honored; naive dates and datetimes are taken as UTC.
pub(crate) fn parse_date_string(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d",
        "%d-%b-%Y",
        "%d/%m/%Y",
        "%Y.%m.%d",
    ];

    for format in &formats {
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Some(naive_dt.and_utc());
        }
        if let Ok(naive_date) = NaiveDate::parse_from_str(date_str, format) {
            return Some(naive_date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

/// First value that parses, in upstream order.
pub(crate) fn first_parseable(values: &[String]) -> Option<DateTime<Utc>> {
    values.iter().find_map(|value| parse_date_string(value))
}

/// Parses an archive capture timestamp (`YYYYMMDDHHMMSS`, UTC).
///
/// Shorter timestamps are accepted down to the 8-digit date prefix.
pub(crate) fn parse_archive_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    let timestamp = timestamp.trim();
    if timestamp.len() < 8 || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    if timestamp.len() >= 14 {
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(&timestamp[..14], "%Y%m%d%H%M%S") {
            return Some(naive_dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(&timestamp[..8], "%Y%m%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive_dt| naive_dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date_string_rfc3339_with_offset() {
        let dt = parse_date_string("1997-09-15T07:00:00+03:00").expect("rfc3339 parses");
        assert_eq!(dt, Utc.with_ymd_and_hms(1997, 9, 15, 4, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_date_string_iso8601_with_millis() {
        let dt = parse_date_string("2024-01-15T10:30:45.123Z").expect("parses");
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-15 10:30:45");
    }

    #[test]
    fn test_parse_date_string_naive_datetime_is_utc() {
        let dt = parse_date_string("2024-01-15 10:30:45").expect("parses");
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 45).unwrap());
    }

    #[test]
    fn test_parse_date_string_date_only_is_midnight() {
        let dt = parse_date_string("2024-01-15").expect("parses");
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_date_string_registry_variants() {
        for input in ["15-Jan-2024", "15/01/2024", "2024.01.15"] {
            let dt = parse_date_string(input).unwrap_or_else(|| panic!("{input} should parse"));
            assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15");
        }
    }

    #[test]
    fn test_parse_date_string_rejects_garbage() {
        assert!(parse_date_string("not a date").is_none());
        assert!(parse_date_string("").is_none());
        assert!(parse_date_string("   ").is_none());
    }

    #[test]
    fn test_first_parseable_skips_unparseable_entries() {
        let values = vec![
            "unknown".to_string(),
            "2001-02-03".to_string(),
            "1999-01-01".to_string(),
        ];
        let dt = first_parseable(&values).expect("second entry parses");
        assert_eq!(dt, Utc.with_ymd_and_hms(2001, 2, 3, 0, 0, 0).unwrap());
        assert!(first_parseable(&[]).is_none());
    }

    #[test]
    fn test_parse_archive_timestamp_full() {
        let dt = parse_archive_timestamp("20010415083012").expect("parses");
        assert_eq!(dt, Utc.with_ymd_and_hms(2001, 4, 15, 8, 30, 12).unwrap());
    }

    #[test]
    fn test_parse_archive_timestamp_date_prefix() {
        let dt = parse_archive_timestamp("20010415").expect("parses");
        assert_eq!(dt, Utc.with_ymd_and_hms(2001, 4, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_archive_timestamp_invalid() {
        assert!(parse_archive_timestamp("2001").is_none());
        assert!(parse_archive_timestamp("2001-04-15").is_none());
        assert!(parse_archive_timestamp("20011345").is_none());
    }
}
