//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert milliseconds to duration
pub fn millis_to_duration(millis: u64) -> std::time::Duration {
    std::time::Duration::from_millis(millis)
}

/// Convert an optional millisecond deadline to a duration
///
/// `None` and `Some(0)` both mean "no deadline".
pub fn optional_deadline(millis: Option<u64>) -> Option<std::time::Duration> {
    millis.filter(|ms| *ms > 0).map(millis_to_duration)
}
