use chrono::prelude::*;
use chrono::{Days, Months};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::scheduling::start_of_day;

/// A regular period of time separating anniversaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Days(u32),
    Weeks(u32),
    /// Whole months. Days beyond the end of a shorter month are clamped to its last day.
    Months(u32),
    Years(u32),
}

impl Period {
    fn is_zero(&self) -> bool {
        matches!(
            self,
            Period::Days(0) | Period::Weeks(0) | Period::Months(0) | Period::Years(0)
        )
    }
}

/// A recurring anniversary of an `anchor` date, every `period`.
///
/// Each anniversary is measured from the anchor itself, so month-end clamping never
/// accumulates: a monthly anniversary anchored on 31st January falls on 29th February 2024
/// and on 31st March 2024.
///
/// ```rust
/// # use workdate::scheduling::{Anniversary, Period, ndt};
/// let timer = Anniversary::try_new(ndt(2024, 1, 31), Period::Months(1)).unwrap();
/// assert_eq!(timer.offset_of(&ndt(2024, 2, 29)), Some(1));
/// assert_eq!(timer.offset_of(&ndt(2024, 3, 31)), Some(2));
/// assert!(!timer.is_anniversary(&ndt(2024, 3, 29)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anniversary {
    anchor: NaiveDateTime,
    period: Period,
}

impl Anniversary {
    /// Create a timer. A zero-length `period` is a [`ScheduleError::Configuration`].
    pub fn try_new(anchor: NaiveDateTime, period: Period) -> ScheduleResult<Self> {
        if period.is_zero() {
            return Err(ScheduleError::Configuration(
                "anniversary `period` must be longer than zero.".to_string(),
            ));
        }
        Ok(Anniversary {
            anchor: start_of_day(&anchor),
            period,
        })
    }

    pub fn anchor(&self) -> NaiveDateTime {
        self.anchor
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// The `n`-th anniversary, where the 0-th is the anchor. `None` if out of range.
    pub fn nth(&self, n: u32) -> Option<NaiveDateTime> {
        match self.period {
            Period::Days(k) => self.anchor.checked_add_days(Days::new(u64::from(k) * u64::from(n))),
            Period::Weeks(k) => self
                .anchor
                .checked_add_days(Days::new(7 * u64::from(k) * u64::from(n))),
            Period::Months(k) => self.anchor.checked_add_months(Months::new(k.checked_mul(n)?)),
            Period::Years(k) => self
                .anchor
                .checked_add_months(Months::new(k.checked_mul(12)?.checked_mul(n)?)),
        }
    }

    /// The number of periods `date` lies from the anchor, if `date` is an anniversary.
    pub fn offset_of(&self, date: &NaiveDateTime) -> Option<u32> {
        let date = start_of_day(date);
        if date < self.anchor {
            return None;
        }
        let (elapsed, step) = self.elapsed_and_step(&date);
        if elapsed % step != 0 {
            return None;
        }
        let n = u32::try_from(elapsed / step).ok()?;
        (self.nth(n)? == date).then_some(n)
    }

    /// Whether `date` is an anniversary of the anchor, including the anchor itself.
    pub fn is_anniversary(&self, date: &NaiveDateTime) -> bool {
        self.offset_of(date).is_some()
    }

    /// The first anniversary on or after `date`.
    pub fn next_on_or_after(&self, date: &NaiveDateTime) -> Option<NaiveDateTime> {
        let date = start_of_day(date);
        if date <= self.anchor {
            return Some(self.anchor);
        }
        let (elapsed, step) = self.elapsed_and_step(&date);
        let n = u32::try_from(elapsed / step).ok()?;
        let candidate = self.nth(n)?;
        if candidate >= date {
            Some(candidate)
        } else {
            self.nth(n.checked_add(1)?)
        }
    }

    /// Units elapsed from the anchor to `date`, and the number of units in one period. Units
    /// are days for day and week periods, and months otherwise.
    fn elapsed_and_step(&self, date: &NaiveDateTime) -> (i64, i64) {
        match self.period {
            Period::Days(k) => ((*date - self.anchor).num_days(), i64::from(k)),
            Period::Weeks(k) => ((*date - self.anchor).num_days(), 7 * i64::from(k)),
            Period::Months(k) => (months_between(&self.anchor, date), i64::from(k)),
            Period::Years(k) => (months_between(&self.anchor, date), 12 * i64::from(k)),
        }
    }
}

fn months_between(start: &NaiveDateTime, end: &NaiveDateTime) -> i64 {
    i64::from(end.year() - start.year()) * 12 + i64::from(end.month()) - i64::from(start.month())
}
