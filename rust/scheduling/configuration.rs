use chrono::prelude::*;
use chrono::Weekday;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::scheduling::{
    get_workdays_by_name, parse_date, Algorithm, Cal, DateRoll, PreferredCalendar,
    ScheduleSettings, DEFAULT_EXCLUDED_DATES, DEFAULT_WORKDAYS,
};

/// The default ceiling on probe steps for a single search.
pub const ITERATION_LIMIT: u32 = 10_000;

/// Values applied when a configuration is constructed without them.
///
/// These replace process-wide mutable statics; they are read once, at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDefaults {
    /// Excluded dates as `"YYYY-MM-DD"` strings.
    pub excluded_dates: Vec<String>,
    /// Maximum number of probe steps per search.
    pub iteration_limit: u32,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        ScheduleDefaults {
            excluded_dates: DEFAULT_EXCLUDED_DATES.iter().map(|s| s.to_string()).collect(),
            iteration_limit: ITERATION_LIMIT,
        }
    }
}

/// A validated, recurring business schedule.
///
/// Standard workdays and excluded dates are held in a [`Cal`]. An optional set of preferred
/// workdays, and an optional [`PreferredCalendar`], define which available dates are
/// *preferred*. The [`Algorithm`] decides how a search settles on a date.
///
/// All fields except `algorithm` are fixed at construction. `algorithm` may be changed between
/// searches; it must not be changed while a search on the same configuration is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleSettings", into = "ScheduleSettings")]
pub struct ScheduleConfiguration {
    pub(crate) calendar: Cal,
    pub(crate) preferred_workdays: Option<IndexSet<Weekday>>,
    pub(crate) preferred_calendar: Option<PreferredCalendar>,
    pub(crate) iteration_limit: u32,
    pub algorithm: Algorithm,
}

impl ScheduleConfiguration {
    /// Create a configuration using [`ScheduleDefaults::default`].
    ///
    /// `excluded_dates` of `None` takes the default excluded-date list.
    ///
    /// # Errors
    /// A [`ScheduleError::Configuration`] if `workdays` is empty, if `preferred_workdays` is not
    /// a subset of `workdays`, or if `preferred_calendar` has no month with a preferred day.
    pub fn try_new(
        workdays: Vec<Weekday>,
        preferred_workdays: Option<Vec<Weekday>>,
        preferred_calendar: Option<PreferredCalendar>,
        excluded_dates: Option<Vec<NaiveDateTime>>,
        algorithm: Algorithm,
    ) -> ScheduleResult<Self> {
        Self::try_new_with_defaults(
            workdays,
            preferred_workdays,
            preferred_calendar,
            excluded_dates,
            algorithm,
            &ScheduleDefaults::default(),
        )
    }

    /// Create a configuration with explicitly supplied defaults.
    pub fn try_new_with_defaults(
        workdays: Vec<Weekday>,
        preferred_workdays: Option<Vec<Weekday>>,
        preferred_calendar: Option<PreferredCalendar>,
        excluded_dates: Option<Vec<NaiveDateTime>>,
        algorithm: Algorithm,
        defaults: &ScheduleDefaults,
    ) -> ScheduleResult<Self> {
        if workdays.is_empty() {
            return Err(ScheduleError::Configuration(
                "`workdays` must contain at least one day of the week.".to_string(),
            ));
        }
        let preferred_workdays: Option<IndexSet<Weekday>> =
            preferred_workdays.map(IndexSet::from_iter);
        if let Some(day) = preferred_workdays
            .iter()
            .flatten()
            .find(|d| !workdays.contains(d))
        {
            return Err(ScheduleError::Configuration(format!(
                "`preferred_workdays` contains {} which is not one of `workdays`.",
                day
            )));
        }
        if let Some(cal) = &preferred_calendar {
            cal.validate()?;
        }
        if defaults.iteration_limit == 0 {
            return Err(ScheduleError::Configuration(
                "`iteration_limit` must be greater than zero.".to_string(),
            ));
        }
        let excluded_dates = match excluded_dates {
            Some(v) => v,
            None => defaults
                .excluded_dates
                .iter()
                .map(|s| parse_date(s))
                .collect::<ScheduleResult<Vec<_>>>()?,
        };
        Ok(ScheduleConfiguration {
            calendar: Cal::new(excluded_dates, workdays),
            preferred_workdays,
            preferred_calendar,
            iteration_limit: defaults.iteration_limit,
            algorithm,
        })
    }

    /// The work calendar of standard workdays and excluded dates.
    pub fn calendar(&self) -> &Cal {
        &self.calendar
    }

    pub fn preferred_calendar(&self) -> Option<&PreferredCalendar> {
        self.preferred_calendar.as_ref()
    }

    pub fn preferred_workdays(&self) -> Option<impl Iterator<Item = &Weekday>> {
        self.preferred_workdays.as_ref().map(|s| s.iter())
    }

    pub fn iteration_limit(&self) -> u32 {
        self.iteration_limit
    }

    /// Whether the date is a standard workday that is not excluded.
    pub fn is_available(&self, date: &NaiveDateTime) -> bool {
        self.calendar.is_bus_day(date)
    }

    /// Whether the date falls on a preferred workday, or on a standard workday if no preferred
    /// workdays are configured.
    pub fn is_preferred_workday(&self, date: &NaiveDateTime) -> bool {
        match &self.preferred_workdays {
            Some(days) => days.contains(&date.weekday()),
            None => self.calendar.is_weekday(date),
        }
    }

    /// Whether the date is a preferred day of its month. Always false without a calendar.
    pub fn is_preferred_calendar_date(&self, date: &NaiveDateTime) -> bool {
        self.preferred_calendar
            .as_ref()
            .is_some_and(|cal| cal.contains(date))
    }

    /// Whether the date is preferred under the active policy.
    ///
    /// A preferred calendar takes precedence over preferred workdays, which take precedence
    /// over the standard workdays.
    pub fn is_preferred(&self, date: &NaiveDateTime) -> bool {
        if self.preferred_calendar.is_some() {
            self.is_preferred_calendar_date(date)
        } else {
            self.is_preferred_workday(date)
        }
    }
}

impl Default for ScheduleConfiguration {
    /// Monday to Friday with no preferences, default exclusions and the default algorithm.
    ///
    /// Panics only if the built-in default constants are themselves invalid.
    fn default() -> Self {
        let workdays = get_workdays_by_name(DEFAULT_WORKDAYS)
            .expect("`DEFAULT_WORKDAYS` must name an existing preset.");
        ScheduleConfiguration::try_new(workdays, None, None, None, Algorithm::default())
            .expect("default schedule constants must form a valid configuration.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::{create_preferred_calendar, ndt};

    fn mon_fri() -> Vec<Weekday> {
        vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
    }

    #[test]
    fn test_empty_workdays_err() {
        let result = ScheduleConfiguration::try_new(vec![], None, None, None, Algorithm::Default);
        assert!(matches!(result, Err(ScheduleError::Configuration(_))));
    }

    #[test]
    fn test_preferred_workdays_subset() {
        let ok = ScheduleConfiguration::try_new(
            mon_fri(),
            Some(vec![Weekday::Fri]),
            None,
            None,
            Algorithm::Default,
        );
        assert!(ok.is_ok());
        let err = ScheduleConfiguration::try_new(
            mon_fri(),
            Some(vec![Weekday::Fri, Weekday::Sat]),
            None,
            None,
            Algorithm::Default,
        );
        assert!(matches!(err, Err(ScheduleError::Configuration(msg)) if msg.contains("Sat")));
    }

    #[test]
    fn test_preferred_calendar_must_have_days() {
        let err = ScheduleConfiguration::try_new(
            mon_fri(),
            None,
            Some(create_preferred_calendar(&[], &[1, 2, 3])),
            None,
            Algorithm::Default,
        );
        assert!(matches!(err, Err(ScheduleError::Configuration(_))));
        let err = ScheduleConfiguration::try_new(
            mon_fri(),
            None,
            Some(PreferredCalendar::new()),
            None,
            Algorithm::Default,
        );
        assert!(matches!(err, Err(ScheduleError::Configuration(_))));
    }

    #[test]
    fn test_zero_iteration_limit_err() {
        let defaults = ScheduleDefaults {
            iteration_limit: 0,
            ..ScheduleDefaults::default()
        };
        let err = ScheduleConfiguration::try_new_with_defaults(
            mon_fri(),
            None,
            None,
            None,
            Algorithm::Default,
            &defaults,
        );
        assert!(matches!(err, Err(ScheduleError::Configuration(_))));
    }

    #[test]
    fn test_defaults_applied() {
        let defaults = ScheduleDefaults {
            excluded_dates: vec!["2024-12-25".to_string()],
            iteration_limit: 50,
        };
        let config = ScheduleConfiguration::try_new_with_defaults(
            mon_fri(),
            None,
            None,
            None,
            Algorithm::Default,
            &defaults,
        )
        .unwrap();
        assert_eq!(config.iteration_limit(), 50);
        assert!(!config.is_available(&ndt(2024, 12, 25)));

        // explicit exclusions replace the defaults
        let config = ScheduleConfiguration::try_new_with_defaults(
            mon_fri(),
            None,
            None,
            Some(vec![]),
            Algorithm::Default,
            &defaults,
        )
        .unwrap();
        assert!(config.is_available(&ndt(2024, 12, 25)));
    }

    #[test]
    fn test_bad_default_exclusion_err() {
        let defaults = ScheduleDefaults {
            excluded_dates: vec!["25/12/2024".to_string()],
            ..ScheduleDefaults::default()
        };
        let err = ScheduleConfiguration::try_new_with_defaults(
            mon_fri(),
            None,
            None,
            None,
            Algorithm::Default,
            &defaults,
        );
        assert_eq!(err, Err(ScheduleError::DateParse("25/12/2024".to_string())));
    }

    #[test]
    fn test_is_available() {
        let config = ScheduleConfiguration::try_new(
            mon_fri(),
            None,
            None,
            Some(vec![ndt(2024, 1, 8)]),
            Algorithm::Default,
        )
        .unwrap();
        assert!(!config.is_available(&ndt(2024, 1, 6))); // Saturday
        assert!(!config.is_available(&ndt(2024, 1, 8))); // excluded Monday
        assert!(config.is_available(&ndt(2024, 1, 9)));
    }

    #[test]
    fn test_is_preferred_dispatch() {
        let plain = ScheduleConfiguration::default();
        assert!(plain.is_preferred(&ndt(2024, 1, 8)));
        assert!(!plain.is_preferred(&ndt(2024, 1, 6)));

        let workday = ScheduleConfiguration::try_new(
            mon_fri(),
            Some(vec![Weekday::Fri]),
            None,
            None,
            Algorithm::Default,
        )
        .unwrap();
        assert!(workday.is_preferred(&ndt(2024, 1, 5)));
        assert!(!workday.is_preferred(&ndt(2024, 1, 8)));
        assert!(!workday.is_preferred_calendar_date(&ndt(2024, 1, 5)));

        // the calendar takes precedence over preferred workdays
        let calendar = ScheduleConfiguration::try_new(
            mon_fri(),
            Some(vec![Weekday::Fri]),
            Some(create_preferred_calendar(&[8], &[1])),
            None,
            Algorithm::Default,
        )
        .unwrap();
        assert!(calendar.is_preferred(&ndt(2024, 1, 8)));
        assert!(!calendar.is_preferred(&ndt(2024, 1, 5)));
        assert!(calendar.is_preferred_workday(&ndt(2024, 1, 5)));
    }

    #[test]
    fn test_algorithm_is_mutable() {
        let mut config = ScheduleConfiguration::default();
        assert_eq!(config.algorithm, Algorithm::Default);
        config.algorithm = Algorithm::NextStandardWorkday;
        assert_eq!(config.algorithm, Algorithm::NextStandardWorkday);
    }

    #[test]
    fn test_default_configuration_is_validated() {
        let config = ScheduleConfiguration::default();
        let expected = ScheduleConfiguration::try_new(
            get_workdays_by_name(DEFAULT_WORKDAYS).unwrap(),
            None,
            None,
            None,
            Algorithm::Default,
        )
        .unwrap();
        assert_eq!(config, expected);
        assert_eq!(config.calendar().workdays().count(), 5);
        assert_eq!(config.calendar().holidays().count(), DEFAULT_EXCLUDED_DATES.len());
        assert_eq!(config.iteration_limit(), ITERATION_LIMIT);
        assert!(config.preferred_calendar().is_none());
        assert!(config.preferred_workdays().is_none());
    }
}
