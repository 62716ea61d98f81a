/// Utility functions
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Accessor returning an optional string field of a record
pub type FieldAccessor<T> = fn(&T) -> Option<&str>;

/// Try accessors in order and return the first present, non-empty value
pub fn first_present<'a, T>(record: &'a T, accessors: &[FieldAccessor<T>]) -> Option<&'a str> {
    accessors
        .iter()
        .filter_map(|accessor| accessor(record))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Offset-less layouts, read as UTC; seconds are optional
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a backend timestamp string into UTC
///
/// Accepts RFC 3339, `YYYY-MM-DD[T ]HH:MM[:SS]` and bare `YYYY-MM-DD`
/// (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|ndt| Utc.from_utc_datetime(&ndt));
    }
    None
}

/// Human-readable UTC launch time, e.g. `October 23, 2025 at 10:30 AM UTC`
pub fn format_launch_time(dt: &DateTime<Utc>) -> String {
    dt.format("%B %-d, %Y at %I:%M %p UTC").to_string()
}

/// Human-readable calendar date, e.g. `October 23, 2025`
pub fn format_calendar_date(dt: &DateTime<Utc>) -> String {
    dt.format("%B %-d, %Y").to_string()
}

/// Signed decimal degrees rendered with hemisphere letters
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    let ns = if latitude < 0.0 { 'S' } else { 'N' };
    let ew = if longitude < 0.0 { 'W' } else { 'E' };
    format!(
        "{:.4}°{}, {:.4}°{}",
        latitude.abs(),
        ns,
        longitude.abs(),
        ew
    )
}

/// Case-insensitive substring check
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        a: Option<String>,
        b: Option<String>,
    }

    fn sample(a: Option<&str>, b: Option<&str>) -> Sample {
        Sample {
            a: a.map(str::to_string),
            b: b.map(str::to_string),
        }
    }

    fn field_a(s: &Sample) -> Option<&str> {
        s.a.as_deref()
    }

    fn field_b(s: &Sample) -> Option<&str> {
        s.b.as_deref()
    }

    const ORDER: &[FieldAccessor<Sample>] = &[field_a, field_b];

    #[test]
    fn test_first_present_finds_first() {
        assert_eq!(first_present(&sample(Some("x"), Some("y")), ORDER), Some("x"));
    }

    #[test]
    fn test_first_present_skips_empty() {
        assert_eq!(first_present(&sample(Some("  "), Some("y")), ORDER), Some("y"));
    }

    #[test]
    fn test_first_present_not_found() {
        assert_eq!(first_present(&sample(None, None), ORDER), None);
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let dt = parse_timestamp("2025-10-23T10:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-10-23T10:30:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_with_offset_normalizes_to_utc() {
        let dt = parse_timestamp("2025-10-23T12:30:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-10-23T10:30:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_space_separated() {
        assert!(parse_timestamp("2024-01-15 10:30:00").is_some());
    }

    #[test]
    fn test_parse_timestamp_without_seconds() {
        let expected = parse_timestamp("2025-10-23T10:30:00Z");
        assert!(expected.is_some());
        assert_eq!(parse_timestamp("2025-10-23T10:30"), expected);
        assert_eq!(parse_timestamp("2025-10-23 10:30"), expected);
    }

    #[test]
    fn test_parse_timestamp_date_only_is_midnight() {
        let dt = parse_timestamp("2025-01-01").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_format_launch_time() {
        let dt = parse_timestamp("2025-10-23T10:30:00Z").unwrap();
        assert_eq!(format_launch_time(&dt), "October 23, 2025 at 10:30 AM UTC");
        let dt = parse_timestamp("2025-11-05T22:45:00Z").unwrap();
        assert_eq!(format_launch_time(&dt), "November 5, 2025 at 10:45 PM UTC");
    }

    #[test]
    fn test_format_coordinates_hemispheres() {
        assert_eq!(
            format_coordinates(28.5729, -80.649),
            "28.5729°N, 80.6490°W"
        );
        assert_eq!(
            format_coordinates(-2.3, 45.25),
            "2.3000°S, 45.2500°E"
        );
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Starlink Mission", "starlink"));
        assert!(!contains_ignore_case("Crew-8", "cargo"));
    }
}
