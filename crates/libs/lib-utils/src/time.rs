//! # Time Utilities
//!
//! Timestamps for session bookkeeping and transaction dates, using chrono.

use chrono::{DateTime, NaiveDate, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Milliseconds since the Unix epoch, the unit the backend uses for `lastCheck`/`timestamp`.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format time as RFC3339 string.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// Parse an RFC3339 timestamp or a plain `yyyy-MM-dd` date (taken as midnight UTC).
pub fn parse_utc(moment: &str) -> Result<DateTime<Utc>, Error> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(moment) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(moment, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::FailToDateParse(moment.to_string()))
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    FailToDateParse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_and_plain_date() {
        let dt = parse_utc("2024-05-01T10:30:00Z").unwrap();
        assert_eq!(format_time(dt), "2024-05-01T10:30:00+00:00");

        let day = parse_utc("2024-05-01").unwrap();
        assert_eq!(day.timestamp(), 1_714_521_600);

        assert!(parse_utc("01/05/2024").is_err());
    }
}
