//! Calendar string handling for appointment dates and times.
//!
//! The backend mixes `DATE` columns and plain strings, and a date pushed
//! through a timezone-aware parser can move by a day. Everything here works
//! on the literal `YYYY-MM-DD` / `HH:MM` text. A `NaiveDateTime` is only
//! built when a chronological comparison is needed, and it is never
//! converted between zones.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Shown in place of a missing date.
pub const DATE_PLACEHOLDER: &str = "-";

const DATE_PREFIX_LEN: usize = 10;
const TIME_PREFIX_LEN: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateTimeError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),
}

/// Source of the current local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// `"HH:MM:SS"` becomes `"HH:MM"`; shorter input is returned as is.
pub fn normalize_time(raw: &str) -> String {
    raw.chars().take(TIME_PREFIX_LEN).collect()
}

/// Date portion of a value that may carry a time component
/// (`2025-08-10T00:00:00Z`, `2025-08-10 00:00:00`).
pub fn date_part(raw: &str) -> &str {
    raw.trim().split(['T', ' ']).next().unwrap_or_default()
}

/// Parse `YYYY-MM-DD` as calendar components.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DateTimeError> {
    let invalid = || DateTimeError::InvalidDate(raw.to_string());
    let mut parts = date_part(raw).split('-');
    let (Some(year), Some(month), Some(day), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    let year = number(year).ok_or_else(invalid)?;
    let month = number(month).ok_or_else(invalid)?;
    let day = number(day).ok_or_else(invalid)?;
    let year = i32::try_from(year).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Parse `HH:MM`, ignoring any seconds.
pub fn parse_time(raw: &str) -> Result<NaiveTime, DateTimeError> {
    let invalid = || DateTimeError::InvalidTime(raw.to_string());
    let normalized = normalize_time(raw.trim());
    let (hour, minute) = normalized.split_once(':').ok_or_else(invalid)?;
    let hour = number(hour).ok_or_else(invalid)?;
    let minute = number(minute).ok_or_else(invalid)?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Combine a date and a time into a local instant for past/future checks.
pub fn to_comparable_instant(date: &str, time: &str) -> Result<NaiveDateTime, DateTimeError> {
    Ok(parse_date(date)?.and_time(parse_time(time)?))
}

/// Render `YYYY-MM-DD` as `DD/MM/YYYY`. Unparseable dates are shown as
/// their raw date portion.
pub fn format_display_date(raw: &str) -> String {
    if raw.trim().is_empty() {
        return DATE_PLACEHOLDER.to_string();
    }
    match parse_date(raw) {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => date_part(raw).to_string(),
    }
}

/// Same calendar day, compared on the first ten characters of each value.
pub fn matches_date_filter(record_date: &str, filter_date: &str) -> bool {
    record_date
        .chars()
        .take(DATE_PREFIX_LEN)
        .eq(filter_date.chars().take(DATE_PREFIX_LEN))
}

fn number(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
