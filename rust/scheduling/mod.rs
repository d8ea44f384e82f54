//! Define a recurring business [`ScheduleConfiguration`] and search it for the next valid date.
//!
//! The purpose of this module is to settle, deterministically and within a bounded amount of
//! work, on the single best date for a recurring business event given;
//! - A set of standard workdays, held with a list of excluded dates in a work [`Cal`].
//! - An optional subset of *preferred* workdays.
//! - An optional [`PreferredCalendar`] of preferred days of the month, per month.
//! - A search [`Algorithm`] deciding whether to look backward, forward or both.
//!
//! # Calendars and Availability
//!
//! A date is **available** when it falls on a standard workday and is not an excluded date.
//! All work calendars implement the [`DateRoll`] trait which provides this classification.
//! Some common working weeks are implemented directly by name.
//!
//! ### Example
//! This example creates a Monday to Friday work calendar with a specific excluded date (the
//! Early May UK Bank Holiday).
//! ```rust
//! # use workdate::scheduling::{Cal, ndt, DateRoll, get_workdays_by_name};
//! let cal = Cal::new(vec![ndt(2017, 5, 1)], get_workdays_by_name("weekdays").unwrap());
//! assert!(!cal.is_bus_day(&ndt(2017, 4, 29))); // Saturday
//! assert!(!cal.is_bus_day(&ndt(2017, 5, 1)));  // Bank Holiday
//! assert!(cal.is_bus_day(&ndt(2017, 5, 2)));
//! ```
//!
//! # Searching
//!
//! [`ScheduleConfiguration::next`] starts at a reference date and returns it if it is both
//! available and preferred. Otherwise the configured [`Algorithm`] is dispatched, which may
//! fall back to other strategies, and failing that the cursor is stepped to the next preferred
//! date and the process repeats. Every probe step draws on a single iteration budget, so a
//! misconfigured schedule fails with
//! [`ScheduleError::IterationLimitExceeded`](crate::error::ScheduleError) rather than looping.
//!
//! ### Example
//! This example prefers Fridays and looks back to the start of the month for the closest one.
//! ```rust
//! # use workdate::scheduling::{ScheduleConfiguration, Algorithm, ndt, get_workdays_by_name};
//! # use chrono::Weekday;
//! let config = ScheduleConfiguration::try_new(
//!     get_workdays_by_name("weekdays").unwrap(), // workdays
//!     Some(vec![Weekday::Fri]),                  // preferred_workdays
//!     None,                                      // preferred_calendar
//!     None,                                      // excluded_dates
//!     Algorithm::ClosestPreferredWorkday,        // algorithm
//! ).unwrap();
//! let date = config.next(Some(ndt(2024, 1, 10)), Some(ndt(2024, 1, 1))).unwrap();
//! assert_eq!(date, ndt(2024, 1, 5));
//! ```

mod algorithm;
mod anniversary;
mod calendars;
mod configuration;
mod preference;
mod search;
mod settings;

mod serde;

pub use crate::scheduling::{
    algorithm::Algorithm,
    anniversary::{Anniversary, Period},
    calendars::{
        first_of_next_month, format_date, get_workdays_by_name, ndt, next_day, parse_date,
        preset_names, previous_day, start_of_day, today, weekday_from_ordinal, weekday_ordinal,
        Cal, DateRoll, DEFAULT_EXCLUDED_DATES, DEFAULT_WORKDAYS,
    },
    configuration::{ScheduleConfiguration, ScheduleDefaults, ITERATION_LIMIT},
    preference::{create_preferred_calendar, PreferredCalendar},
    settings::{ScheduleSettings, WorkdaySpec},
};
