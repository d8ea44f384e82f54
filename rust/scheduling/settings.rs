use chrono::Weekday;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ScheduleError, ScheduleResult};
use crate::scheduling::{
    format_date, get_workdays_by_name, parse_date, weekday_from_ordinal, weekday_ordinal,
    Algorithm, PreferredCalendar, ScheduleConfiguration, ScheduleDefaults, DEFAULT_WORKDAYS,
};

/// Standard workdays given either by preset name or by Sunday=0 ordinals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkdaySpec {
    /// A named working week, e.g. `"weekdays"` or `"sun-thu"`.
    Named(String),
    /// Weekday ordinals, 0=Sun,.., 6=Sat.
    Ordinals(Vec<u8>),
}

impl WorkdaySpec {
    pub fn weekdays(&self) -> ScheduleResult<Vec<Weekday>> {
        match self {
            WorkdaySpec::Named(name) => get_workdays_by_name(name),
            WorkdaySpec::Ordinals(v) => parse_ordinals(v),
        }
    }
}

impl Default for WorkdaySpec {
    fn default() -> Self {
        WorkdaySpec::Named(DEFAULT_WORKDAYS.to_string())
    }
}

impl FromStr for WorkdaySpec {
    type Err = ScheduleError;

    /// A comma separated list of ordinals (`"1,2,3"`) or else a preset name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(WorkdaySpec::Ordinals(vec![]));
        }
        if s.starts_with(|c: char| c.is_ascii_digit()) {
            let ordinals = s
                .split(',')
                .map(|x| {
                    x.trim()
                        .parse::<u8>()
                        .map_err(|_| ScheduleError::UnknownPreset(s.to_string()))
                })
                .collect::<ScheduleResult<Vec<u8>>>()?;
            Ok(WorkdaySpec::Ordinals(ordinals))
        } else {
            Ok(WorkdaySpec::Named(s.to_string()))
        }
    }
}

fn parse_ordinals(ordinals: &[u8]) -> ScheduleResult<Vec<Weekday>> {
    ordinals.iter().map(|o| weekday_from_ordinal(*o)).collect()
}

/// The boundary form of a [`ScheduleConfiguration`], as read from and written to JSON.
///
/// Excluded dates are `"YYYY-MM-DD"` strings and weekdays are Sunday=0 ordinals. Every field
/// is optional in the serialized form.
///
/// ```rust
/// # use workdate::scheduling::{ScheduleSettings, ndt};
/// # use workdate::json::JSON;
/// let settings = ScheduleSettings::from_json(
///     r#"{"workdays": "weekdays", "excluded_dates": ["2024-01-08"], "algorithm": "next_standard_workday"}"#
/// ).unwrap();
/// let config = settings.build().unwrap();
/// assert_eq!(config.next(Some(ndt(2024, 1, 6)), None).unwrap(), ndt(2024, 1, 9));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleSettings {
    pub workdays: WorkdaySpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_workdays: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_calendar: Option<PreferredCalendar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_dates: Option<Vec<String>>,
    pub algorithm: Algorithm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration_limit: Option<u32>,
}

impl ScheduleSettings {
    /// Validate the settings into a [`ScheduleConfiguration`].
    pub fn build(&self) -> ScheduleResult<ScheduleConfiguration> {
        let mut defaults = ScheduleDefaults::default();
        if let Some(limit) = self.iteration_limit {
            defaults.iteration_limit = limit;
        }
        let preferred_workdays = self
            .preferred_workdays
            .as_deref()
            .map(parse_ordinals)
            .transpose()?;
        let excluded_dates = self
            .excluded_dates
            .as_ref()
            .map(|v| v.iter().map(|s| parse_date(s)).collect::<ScheduleResult<Vec<_>>>())
            .transpose()?;
        ScheduleConfiguration::try_new_with_defaults(
            self.workdays.weekdays()?,
            preferred_workdays,
            self.preferred_calendar.clone(),
            excluded_dates,
            self.algorithm,
            &defaults,
        )
    }
}

impl TryFrom<ScheduleSettings> for ScheduleConfiguration {
    type Error = ScheduleError;

    fn try_from(settings: ScheduleSettings) -> Result<Self, Self::Error> {
        settings.build()
    }
}

impl From<ScheduleConfiguration> for ScheduleSettings {
    fn from(config: ScheduleConfiguration) -> Self {
        ScheduleSettings {
            workdays: WorkdaySpec::Ordinals(config.calendar.workdays().map(weekday_ordinal).collect()),
            preferred_workdays: config
                .preferred_workdays
                .as_ref()
                .map(|s| s.iter().map(weekday_ordinal).collect()),
            preferred_calendar: config.preferred_calendar.clone(),
            excluded_dates: Some(config.calendar.holidays().map(format_date).collect_vec()),
            algorithm: config.algorithm,
            iteration_limit: Some(config.iteration_limit),
        }
    }
}
