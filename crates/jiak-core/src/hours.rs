//! Opening-hours helpers.
//!
//! Periods use the Places convention: `day` counts from Sunday = 0 and
//! `time` is a four-digit `HHMM` string. The weekday-text list on an eatery
//! is ordered Monday first.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

pub const HOURS_NOT_AVAILABLE: &str = "Hours not available";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHoursDetails {
    #[serde(default)]
    pub periods: Vec<Period>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub open: DayTime,
    pub close: DayTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTime {
    pub day: u8,
    pub time: String,
}

fn parse_hhmm(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok()
}

/// Returns `true` if a period opening on `weekday` (Sunday = 0) covers
/// `hhmm`, inclusive at both ends.
///
/// Only the period's opening day is consulted, so periods that run past
/// midnight are matched against the close time as written.
#[must_use]
pub fn is_open_at(details: &OpeningHoursDetails, weekday: u8, hhmm: u16) -> bool {
    details
        .periods
        .iter()
        .filter(|p| p.open.day == weekday)
        .any(|p| match (parse_hhmm(&p.open.time), parse_hhmm(&p.close.time)) {
            (Some(open), Some(close)) => open <= hhmm && hhmm <= close,
            _ => false,
        })
}

#[must_use]
pub fn is_open_now<Tz: TimeZone>(details: &OpeningHoursDetails, now: &DateTime<Tz>) -> bool {
    let weekday = u8::try_from(now.weekday().num_days_from_sunday()).unwrap_or(0);
    let hhmm = u16::try_from(now.hour() * 100 + now.minute()).unwrap_or(0);
    is_open_at(details, weekday, hhmm)
}

/// Picks the weekday-text line for `weekday` (Sunday = 0) out of a
/// Monday-first list.
#[must_use]
pub fn todays_hours(hours: &[String], weekday: u8) -> &str {
    let index = if weekday == 0 {
        6
    } else {
        usize::from(weekday) - 1
    };
    hours
        .get(index)
        .map(String::as_str)
        .filter(|line| !line.is_empty())
        .unwrap_or(HOURS_NOT_AVAILABLE)
}
