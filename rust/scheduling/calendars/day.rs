use chrono::prelude::*;
use chrono::Days;

use crate::error::{ScheduleError, ScheduleResult};

/// Create a `NaiveDateTime` with default null time.
///
/// Panics if date values are invalid.
pub fn ndt(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("`year`, `month` `day` are invalid.")
        .and_time(NaiveTime::MIN)
}

/// Truncate a timestamp to the start of its calendar day.
pub fn start_of_day(date: &NaiveDateTime) -> NaiveDateTime {
    date.date().and_time(NaiveTime::MIN)
}

/// The local calendar date, at the start of day.
pub fn today() -> NaiveDateTime {
    Local::now().date_naive().and_time(NaiveTime::MIN)
}

/// Parse a boundary date.
///
/// Accepts `"YYYY-MM-DD"`, `"YYYY-MM-DD HH:MM:SS"` (the time is discarded) and the keyword
/// `"today"`.
pub fn parse_date(text: &str) -> ScheduleResult<NaiveDateTime> {
    let s = text.trim();
    if s.eq_ignore_ascii_case("today") {
        return Ok(today());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| start_of_day(&dt))
        .ok_or_else(|| ScheduleError::DateParse(text.to_string()))
}

/// Format a date as `"YYYY-MM-DD"`.
pub fn format_date(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The following day, or `None` past the last representable date.
pub fn next_day(date: &NaiveDateTime) -> Option<NaiveDateTime> {
    date.checked_add_days(Days::new(1))
}

/// The preceding day, or `None` before the first representable date.
pub fn previous_day(date: &NaiveDateTime) -> Option<NaiveDateTime> {
    date.checked_sub_days(Days::new(1))
}

/// Day 1 of the month following `date`, or `None` past the last representable date.
pub fn first_of_next_month(date: &NaiveDateTime) -> Option<NaiveDateTime> {
    let (year, month) = match date.month() {
        12 => (date.year().checked_add(1)?, 1),
        m => (date.year(), m + 1),
    };
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.and_time(NaiveTime::MIN))
}

/// Convert a weekday ordinal (0=Sun,.., 6=Sat) into a `Weekday`.
pub fn weekday_from_ordinal(ordinal: u8) -> ScheduleResult<Weekday> {
    match ordinal {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        _ => Err(ScheduleError::InvalidWeekday(ordinal)),
    }
}

/// The ordinal of a `Weekday` under the Sunday=0 convention.
pub fn weekday_ordinal(weekday: &Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}
