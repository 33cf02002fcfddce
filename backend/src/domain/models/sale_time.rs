//! Timestamp parsing for sale line items.
//!
//! Upstream sends `created_at` in several shapes depending on which endpoint
//! produced the record. Every shape is resolved against an explicit timezone
//! so that callers control what "local calendar date" means.
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Wall-clock formats without an offset, interpreted in the caller's timezone.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a raw `created_at` value into a point in time in `tz`.
///
/// Returns `None` for anything that cannot be placed on the timeline.
pub fn parse_sale_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Epoch milliseconds
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        let millis = raw.parse::<i64>().ok()?;
        return DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(tz));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(tz));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(parsed.with_timezone(tz));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
}

/// Local calendar date of a raw `created_at` value in `tz`.
pub fn sale_date<Tz: TimeZone>(raw: Option<&str>, tz: &Tz) -> Option<NaiveDate> {
    raw.and_then(|raw| parse_sale_timestamp(raw, tz))
        .map(|timestamp| timestamp.date_naive())
}
