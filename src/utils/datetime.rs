use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Parse a client-supplied timestamp.
///
/// Accepts RFC 3339 (`2026-03-01T15:00:00+01:00`), a naive `2026-03-01 15:00:00` or
/// `2026-03-01T15:00:00` (read as UTC), or a bare date (midnight UTC).
#[must_use]
pub fn parse_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    parse_date(value)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Parse a `YYYY-MM-DD` calendar date.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
