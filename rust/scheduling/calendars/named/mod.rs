//! Static data for pre-existing named working weeks.
//!

pub mod all;
pub mod mon_sat;
pub mod sun_thu;
pub mod weekdays;
pub mod weekend;

use chrono::Weekday;
use std::collections::HashMap;

use crate::error::{ScheduleError, ScheduleResult};
use crate::scheduling::weekday_from_ordinal;

/// The name of the working week used when none is given.
pub const DEFAULT_WORKDAYS: &str = "weekdays";

/// The built-in excluded dates, as `"YYYY-MM-DD"` strings, applied when none are given.
pub const DEFAULT_EXCLUDED_DATES: &[&str] = &[];

fn presets() -> HashMap<&'static str, &'static [u8]> {
    HashMap::from([
        ("all", all::WORKDAYS),
        ("weekdays", weekdays::WORKDAYS),
        ("mon-sat", mon_sat::WORKDAYS),
        ("sun-thu", sun_thu::WORKDAYS),
        ("weekend", weekend::WORKDAYS),
    ])
}

/// Return the standard workdays of a named working week.
pub fn get_workdays_by_name(name: &str) -> ScheduleResult<Vec<Weekday>> {
    match presets().get(name.to_lowercase().as_str()) {
        None => Err(ScheduleError::UnknownPreset(name.to_string())),
        Some(value) => value.iter().map(|v| weekday_from_ordinal(*v)).collect(),
    }
}

/// The names of all pre-existing working weeks, sorted.
pub fn preset_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = presets().into_keys().collect();
    names.sort_unstable();
    names
}
