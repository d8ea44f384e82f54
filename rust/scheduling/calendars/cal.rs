use chrono::prelude::*;
use chrono::Weekday;
use indexmap::set::IndexSet;
use serde::{Deserialize, Serialize};

use crate::scheduling::{start_of_day, DateRoll};

/// A work calendar with a singular list of excluded dates.
///
/// A work calendar is formed of 2 components:
///
/// - `workdays`: which defines the days of the week that are standard workdays. In Western
///   culture these are typically Monday to Friday.
/// - `holidays`: which defines specific dates that are excluded from the working week, and
///   cannot be available days.
///
#[derive(Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cal {
    pub(crate) holidays: IndexSet<NaiveDateTime>,
    pub(crate) workdays: IndexSet<Weekday>,
}

impl Cal {
    /// Create a calendar.
    ///
    /// `holidays` provide a vector of dates that cannot be available days; any time component
    /// is discarded. `workdays` are the days of the week that make up the working week.
    pub fn new(holidays: Vec<NaiveDateTime>, workdays: Vec<Weekday>) -> Self {
        Cal {
            holidays: holidays.iter().map(start_of_day).collect(),
            workdays: IndexSet::from_iter(workdays),
        }
    }

    /// The standard workdays of the calendar.
    pub fn workdays(&self) -> impl Iterator<Item = &Weekday> {
        self.workdays.iter()
    }

    /// The excluded dates of the calendar, in insertion order.
    pub fn holidays(&self) -> impl Iterator<Item = &NaiveDateTime> {
        self.holidays.iter()
    }
}

impl DateRoll for Cal {
    fn is_weekday(&self, date: &NaiveDateTime) -> bool {
        self.workdays.contains(&date.weekday())
    }

    fn is_holiday(&self, date: &NaiveDateTime) -> bool {
        self.holidays.contains(date)
    }
}

// UNIT TESTS
#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::ndt;

    fn fixture_hol_cal() -> Cal {
        let hols = vec![ndt(2015, 9, 5), ndt(2015, 9, 7)]; // Saturday and Monday
        Cal::new(hols, vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri])
    }

    #[test]
    fn test_is_holiday() {
        let cal = fixture_hol_cal();
        let hol =
            NaiveDateTime::parse_from_str("2015-09-07 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let no_hol =
            NaiveDateTime::parse_from_str("2015-09-10 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let saturday =
            NaiveDateTime::parse_from_str("2024-01-06 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert!(cal.is_holiday(&hol)); // In hol list
        assert!(!cal.is_holiday(&no_hol)); // Not in hol list
        assert!(!cal.is_holiday(&saturday)); // Not in hol list
    }

    #[test]
    fn test_is_weekday() {
        let cal = fixture_hol_cal();
        assert!(cal.is_weekday(&ndt(2015, 9, 7))); // Monday
        assert!(cal.is_weekday(&ndt(2015, 9, 10))); // Thursday
        assert!(!cal.is_weekday(&ndt(2024, 1, 6))); // Saturday
        assert!(!cal.is_weekday(&ndt(2024, 1, 7))); // Sunday
    }

    #[test]
    fn test_holidays_normalized_to_start_of_day() {
        let late =
            NaiveDateTime::parse_from_str("2015-09-08 18:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let cal = Cal::new(vec![late], vec![Weekday::Tue]);
        assert!(cal.is_holiday(&ndt(2015, 9, 8)));
        assert!(!cal.is_bus_day(&ndt(2015, 9, 8)));
        assert!(cal.is_bus_day(&ndt(2015, 9, 15)));
    }

    #[test]
    fn test_duplicate_holidays_collapse() {
        let cal = Cal::new(vec![ndt(2015, 9, 8), ndt(2015, 9, 8)], vec![Weekday::Tue]);
        assert_eq!(cal.holidays().count(), 1);
        assert_eq!(cal.workdays().collect::<Vec<_>>(), vec![&Weekday::Tue]);
    }
}
