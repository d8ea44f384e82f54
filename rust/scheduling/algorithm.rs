use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;

/// Specifier for the search strategy used to settle on a date.
///
/// *Closest* strategies probe backward from the cursor down to the lower bound before
/// falling back to a forward strategy one day past the starting cursor. *Next* strategies only
/// probe forward.
#[derive(Debug, Hash, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// The closest preferred available date at or before the cursor, else the closest available
    /// date, else [`NextPreferredThenClosestStandardWorkday`](Algorithm) from the day after.
    ClosestPreferredThenClosestStandardWorkday,
    /// The closest preferred available date at or before the cursor, else
    /// [`NextPreferredWorkday`](Algorithm) from the day after.
    ClosestPreferredWorkday,
    /// The closest available date at or before the cursor, else
    /// [`NextStandardWorkday`](Algorithm) from the day after.
    ClosestStandardWorkday,
    /// The next preferred date; if it is not available, the closest available date at or
    /// before it.
    NextPreferredThenClosestStandardWorkday,
    /// The next date that is both preferred and available.
    NextPreferredWorkday,
    /// The next available date, ignoring preference.
    NextStandardWorkday,
    /// The next available date on the preferred calendar, or on a preferred workday if no
    /// calendar is configured. Never settles on a non-preferred date when a preference exists.
    OnlyPreferredDates,
    /// Alias of [`ClosestPreferredThenClosestStandardWorkday`](Algorithm).
    #[default]
    Default,
}

impl Algorithm {
    /// Resolve the [`Default`](Algorithm::Default) alias to a concrete strategy.
    pub fn resolve(self) -> Algorithm {
        match self {
            Algorithm::Default => Algorithm::ClosestPreferredThenClosestStandardWorkday,
            other => other,
        }
    }

    /// Whether the strategy only searches forward from the starting date.
    pub fn is_forward_only(&self) -> bool {
        matches!(
            self.resolve(),
            Algorithm::NextPreferredThenClosestStandardWorkday
                | Algorithm::NextPreferredWorkday
                | Algorithm::NextStandardWorkday
                | Algorithm::OnlyPreferredDates
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::ClosestPreferredThenClosestStandardWorkday => {
                "closest_preferred_then_closest_standard_workday"
            }
            Algorithm::ClosestPreferredWorkday => "closest_preferred_workday",
            Algorithm::ClosestStandardWorkday => "closest_standard_workday",
            Algorithm::NextPreferredThenClosestStandardWorkday => {
                "next_preferred_then_closest_standard_workday"
            }
            Algorithm::NextPreferredWorkday => "next_preferred_workday",
            Algorithm::NextStandardWorkday => "next_standard_workday",
            Algorithm::OnlyPreferredDates => "only_preferred_dates",
            Algorithm::Default => "default",
        }
    }

    pub fn all() -> [Algorithm; 8] {
        [
            Algorithm::ClosestPreferredThenClosestStandardWorkday,
            Algorithm::ClosestPreferredWorkday,
            Algorithm::ClosestStandardWorkday,
            Algorithm::NextPreferredThenClosestStandardWorkday,
            Algorithm::NextPreferredWorkday,
            Algorithm::NextStandardWorkday,
            Algorithm::OnlyPreferredDates,
            Algorithm::Default,
        ]
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Algorithm::all()
            .into_iter()
            .find(|a| a.name() == key)
            .ok_or_else(|| ScheduleError::UnknownAlgorithm(s.to_string()))
    }
}
