//! This is the documentation for workdate
//!
//! *workdate* computes the next valid calendar date under a recurring business schedule: a
//! set of standard workdays, optional preferred workdays, an optional calendar of preferred
//! days of the month, and a set of excluded dates. See the [`scheduling`] module.


pub mod error;
pub mod json;
pub mod scheduling;

pub use error::{ScheduleError, ScheduleResult};
