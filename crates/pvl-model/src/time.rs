//! Timestamp parsing and encoding.
//!
//! Exposure timestamps keep the offset they were recorded with so that any
//! derived instant (estimated onset, overlap window) is reported in the same
//! timezone as its source.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
};

/// Timestamp type used by every record.
pub type Timestamp = DateTime<FixedOffset>;

/// Stand-in for "still ongoing" when an exposure has no stop time.
pub const OPEN_END: NaiveDateTime = {
    let date = match NaiveDate::from_ymd_opt(9999, 12, 31) {
        Some(date) => date,
        None => panic!("invalid open-end date"),
    };
    let time = match NaiveTime::from_hms_opt(23, 59, 59) {
        Some(time) => time,
        None => panic!("invalid open-end time"),
    };
    NaiveDateTime::new(date, time)
};

/// The open-end sentinel as a UTC timestamp.
pub fn open_end() -> Timestamp {
    OPEN_END.and_utc().fixed_offset()
}

/// Parses a source timestamp.
///
/// Accepted forms, tried in order:
/// - RFC 3339 (`2020-01-01T10:00:00Z`, `2020-01-01T10:00:00+02:00`)
/// - space-separated with offset (`2020-01-01 10:00:00+00:00`)
/// - naive date-time, taken as UTC (`2020-01-01T10:00:00`, `2020-01-01 10:00:00`)
/// - bare date, taken as midnight UTC (`2020-01-01`)
///
/// Anything else, including blank input, is missing.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(ts);
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}

/// Encodes a timestamp as RFC 3339 with seconds precision (`Z` for UTC).
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
