//! Date-key and duration formatting helpers shared by the report builders.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::CoreError;

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a date as the `YYYY-MM-DD` key used throughout storage.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key, rejecting anything malformed.
pub fn parse_day_key(key: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT)
        .map_err(|_| CoreError::Validation(format!("invalid date '{key}', expected YYYY-MM-DD")))
}

/// `HH:MM` clock label for timeline rendering.
pub fn clock_label(instant: DateTime<Utc>) -> String {
    instant.format("%H:%M").to_string()
}

/// Whole minutes, rounded half away from zero.
pub fn secs_to_minutes(secs: u64) -> u64 {
    ((secs as f64) / 60.0).round() as u64
}

/// Human-readable duration: `2小时15分钟`, `45分钟`, `30秒`.
pub fn format_duration(secs: u64) -> String {
    if secs >= 3600 {
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        if minutes == 0 {
            format!("{hours}小时")
        } else {
            format!("{hours}小时{minutes}分钟")
        }
    } else if secs >= 60 {
        format!("{}分钟", secs / 60)
    } else {
        format!("{secs}秒")
    }
}
