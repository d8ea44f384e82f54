use chrono::prelude::*;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ScheduleError, ScheduleResult};

/// Preferred days of the month, per month of the year.
///
/// A month which is absent, or which maps to an empty set of days, has no preferred date.
/// Days that do not exist in a given month (e.g. 30 in February) never match.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferredCalendar {
    months: IndexMap<u32, IndexSet<u32>>,
}

impl PreferredCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add preferred `days` to a `month`, extending any days already present.
    pub fn insert<I: IntoIterator<Item = u32>>(&mut self, month: u32, days: I) -> &mut Self {
        self.months.entry(month).or_default().extend(days);
        self
    }

    /// The preferred days of a month (1=Jan,.., 12=Dec), if the month is present.
    pub fn days_in_month(&self, month: u32) -> Option<&IndexSet<u32>> {
        self.months.get(&month)
    }

    /// Whether the month has at least one preferred day.
    pub fn has_days_in_month(&self, month: u32) -> bool {
        self.days_in_month(month).is_some_and(|days| !days.is_empty())
    }

    /// Whether the day of month of `date` is preferred within its month.
    pub fn contains(&self, date: &NaiveDateTime) -> bool {
        self.days_in_month(date.month())
            .is_some_and(|days| days.contains(&date.day()))
    }

    /// Whether no month carries a preferred day.
    pub fn is_empty(&self) -> bool {
        self.months.values().all(IndexSet::is_empty)
    }

    pub(crate) fn validate(&self) -> ScheduleResult<()> {
        if self.is_empty() {
            return Err(ScheduleError::Configuration(
                "`preferred_calendar` must contain at least one month with preferred days."
                    .to_string(),
            ));
        }
        if let Some(month) = self.months.keys().find(|m| !(1..=12).contains(*m)) {
            return Err(ScheduleError::Configuration(format!(
                "`preferred_calendar` month {} is not in [1, 12].",
                month
            )));
        }
        if let Some(day) = self
            .months
            .values()
            .flatten()
            .find(|d| !(1..=31).contains(*d))
        {
            return Err(ScheduleError::Configuration(format!(
                "`preferred_calendar` day {} is not in [1, 31].",
                day
            )));
        }
        Ok(())
    }
}

impl FromIterator<(u32, Vec<u32>)> for PreferredCalendar {
    fn from_iter<T: IntoIterator<Item = (u32, Vec<u32>)>>(iter: T) -> Self {
        let mut cal = PreferredCalendar::new();
        for (month, days) in iter {
            cal.insert(month, days);
        }
        cal
    }
}

impl fmt::Display for PreferredCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self
            .months
            .iter()
            .sorted_by_key(|(month, _)| **month)
            .map(|(month, days)| format!("{}: [{}]", month, days.iter().sorted().join(", ")))
            .join("; ");
        write!(f, "{{{}}}", body)
    }
}

/// Create a [`PreferredCalendar`] mapping every month in `months_of_year` to the same
/// `days_of_month`.
///
/// No validation is performed here; the configuration constructor checks the result.
pub fn create_preferred_calendar(days_of_month: &[u32], months_of_year: &[u32]) -> PreferredCalendar {
    months_of_year
        .iter()
        .map(|month| (*month, days_of_month.to_vec()))
        .collect()
}
