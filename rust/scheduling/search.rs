use chrono::prelude::*;
use tracing::{debug, trace, warn};

use crate::error::{ScheduleError, ScheduleResult};
use crate::scheduling::{
    first_of_next_month, format_date, next_day, previous_day, start_of_day, today, Algorithm,
    ScheduleConfiguration,
};

/// The number of probe steps remaining to a single search.
///
/// One budget is shared by the stepper and every strategy invoked during a search, including
/// strategies reached by fallback. Each single-day move of a probe consumes one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Budget {
    remaining: u32,
}

impl Budget {
    pub fn new(limit: u32) -> Self {
        Budget { remaining: limit }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Consume one step. Returns `false`, consuming nothing, when no steps remain.
    pub fn tick(&mut self) -> bool {
        match self.remaining.checked_sub(1) {
            Some(r) => {
                self.remaining = r;
                true
            }
            None => false,
        }
    }
}

/// Ephemeral state of one search: the cursor, the inclusive lower bound for backward probes,
/// and the shared [`Budget`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchState {
    pub cursor: NaiveDateTime,
    pub lower_bound: NaiveDateTime,
    pub budget: Budget,
}

impl SearchState {
    pub fn new(from: NaiveDateTime, lower_bound: NaiveDateTime, limit: u32) -> Self {
        SearchState {
            cursor: from,
            lower_bound,
            budget: Budget::new(limit),
        }
    }
}

/// Outcome of a backward probe.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Probe {
    Found(NaiveDateTime),
    /// The lower bound was passed without a match.
    OutOfBounds,
    Exhausted,
}

/// Outcome of one strategy handler.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Transition {
    /// The search settled, successfully or not, with the cursor at its final position.
    Settled(bool),
    /// Continue with another strategy from the current state.
    Fallback(Algorithm),
}

/// The longest possible fallback chain: Default, ClosestPreferredThenClosestStandardWorkday,
/// NextPreferredThenClosestStandardWorkday, ClosestStandardWorkday, NextStandardWorkday.
const MAX_TRANSITIONS: usize = 5;

/// A search over a configuration, owning the mutable [`SearchState`].
pub(crate) struct Search<'a> {
    config: &'a ScheduleConfiguration,
    state: SearchState,
}

impl<'a> Search<'a> {
    pub(crate) fn new(config: &'a ScheduleConfiguration, state: SearchState) -> Self {
        Search { config, state }
    }

    pub(crate) fn state(&self) -> &SearchState {
        &self.state
    }

    /// Move the cursor forward to the next preferred date.
    ///
    /// Under a preferred calendar a month without preferred days is skipped whole, to day 1 of
    /// the next month. Returns `false` when the budget runs out first, leaving the cursor on the
    /// last date probed.
    pub(crate) fn advance_to_preferred(&mut self) -> ScheduleResult<bool> {
        let config = self.config;
        while self.state.budget.tick() {
            let cursor = self.state.cursor;
            let next = match config.preferred_calendar() {
                Some(cal) if !cal.has_days_in_month(cursor.month()) => first_of_next_month(&cursor),
                _ => next_day(&cursor),
            };
            self.state.cursor = next.ok_or_else(|| out_of_range(&cursor))?;
            if config.is_preferred(&self.state.cursor) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Probe from the cursor backward to the lower bound, inclusive, without moving the cursor.
    fn probe_backward<F>(&mut self, accept: F) -> Probe
    where
        F: Fn(&NaiveDateTime) -> bool,
    {
        let mut date = self.state.cursor;
        loop {
            if date < self.state.lower_bound {
                return Probe::OutOfBounds;
            }
            if accept(&date) {
                return Probe::Found(date);
            }
            if !self.state.budget.tick() {
                return Probe::Exhausted;
            }
            match previous_day(&date) {
                Some(d) => date = d,
                None => return Probe::OutOfBounds,
            }
        }
    }

    /// Move the cursor forward until `accept` holds. Returns `false` if the budget runs out.
    fn probe_forward<F>(&mut self, accept: F) -> ScheduleResult<bool>
    where
        F: Fn(&NaiveDateTime) -> bool,
    {
        loop {
            let cursor = self.state.cursor;
            if accept(&cursor) {
                return Ok(true);
            }
            if !self.state.budget.tick() {
                return Ok(false);
            }
            self.state.cursor = next_day(&cursor).ok_or_else(|| out_of_range(&cursor))?;
        }
    }

    /// Restart one day past `start`, raising the lower bound to the new cursor.
    fn fall_forward(&mut self, start: NaiveDateTime, next: Algorithm) -> ScheduleResult<Transition> {
        self.state.cursor = next_day(&start).ok_or_else(|| out_of_range(&start))?;
        self.state.lower_bound = self.state.cursor;
        Ok(Transition::Fallback(next))
    }

    fn settle_on(&mut self, date: NaiveDateTime) -> Transition {
        self.state.cursor = date;
        Transition::Settled(true)
    }

    fn step(&mut self, algorithm: Algorithm) -> ScheduleResult<Transition> {
        let config = self.config;
        let available = |d: &NaiveDateTime| config.is_available(d);
        let preferred = |d: &NaiveDateTime| config.is_available(d) && config.is_preferred(d);
        let start = self.state.cursor;

        let transition = match algorithm {
            Algorithm::ClosestPreferredThenClosestStandardWorkday => {
                match self.probe_backward(preferred) {
                    Probe::Found(d) => self.settle_on(d),
                    Probe::Exhausted => Transition::Settled(false),
                    Probe::OutOfBounds => match self.probe_backward(available) {
                        Probe::Found(d) => self.settle_on(d),
                        Probe::Exhausted => Transition::Settled(false),
                        Probe::OutOfBounds => self.fall_forward(
                            start,
                            Algorithm::NextPreferredThenClosestStandardWorkday,
                        )?,
                    },
                }
            }
            Algorithm::ClosestPreferredWorkday => match self.probe_backward(preferred) {
                Probe::Found(d) => self.settle_on(d),
                Probe::Exhausted => Transition::Settled(false),
                Probe::OutOfBounds => self.fall_forward(start, Algorithm::NextPreferredWorkday)?,
            },
            Algorithm::ClosestStandardWorkday => match self.probe_backward(available) {
                Probe::Found(d) => self.settle_on(d),
                Probe::Exhausted => Transition::Settled(false),
                Probe::OutOfBounds => self.fall_forward(start, Algorithm::NextStandardWorkday)?,
            },
            Algorithm::NextPreferredThenClosestStandardWorkday => {
                if !self.probe_forward(|d| config.is_preferred(d))? {
                    Transition::Settled(false)
                } else if config.is_available(&self.state.cursor) {
                    Transition::Settled(true)
                } else {
                    Transition::Fallback(Algorithm::ClosestStandardWorkday)
                }
            }
            Algorithm::NextPreferredWorkday => Transition::Settled(self.probe_forward(preferred)?),
            Algorithm::NextStandardWorkday => Transition::Settled(self.probe_forward(available)?),
            Algorithm::OnlyPreferredDates => {
                if config.preferred_calendar().is_some() {
                    Transition::Settled(self.probe_forward(|d| {
                        config.is_available(d) && config.is_preferred_calendar_date(d)
                    })?)
                } else if config.preferred_workdays().is_some() {
                    Transition::Settled(
                        self.probe_forward(|d| config.is_available(d) && config.is_preferred_workday(d))?,
                    )
                } else {
                    Transition::Fallback(Algorithm::NextStandardWorkday)
                }
            }
            Algorithm::Default => Transition::Fallback(algorithm.resolve()),
        };
        Ok(transition)
    }

    /// Run a strategy, following its fallbacks, from the current state.
    ///
    /// Returns `true` if the cursor settled on a qualifying date.
    pub(crate) fn dispatch(&mut self, algorithm: Algorithm) -> ScheduleResult<bool> {
        let mut algorithm = algorithm;
        for _ in 0..MAX_TRANSITIONS {
            match self.step(algorithm)? {
                Transition::Settled(found) => return Ok(found),
                Transition::Fallback(next) => {
                    trace!(
                        from = %algorithm,
                        to = %next,
                        cursor = %format_date(&self.state.cursor),
                        lower_bound = %format_date(&self.state.lower_bound),
                        "Strategy falling back"
                    );
                    algorithm = next;
                }
            }
        }
        Ok(false)
    }

    /// Coordinate strategy dispatch and preferred-date stepping until a date is settled or
    /// the budget runs out.
    pub(crate) fn run(&mut self, algorithm: Algorithm) -> ScheduleResult<NaiveDateTime> {
        let config = self.config;
        // a closest strategy with room behind the cursor probes back from the cursor itself
        let looks_back = !algorithm.is_forward_only() && self.state.lower_bound < self.state.cursor;
        if !looks_back && !config.is_preferred(&self.state.cursor) {
            self.advance_to_preferred()?;
        }
        while !self.state.budget.is_exhausted() {
            let cursor = self.state.cursor;
            if config.is_available(&cursor) && config.is_preferred(&cursor) {
                return Ok(cursor);
            }
            if self.dispatch(algorithm)? {
                return Ok(self.state.cursor);
            }
            self.advance_to_preferred()?;
        }
        warn!(
            limit = config.iteration_limit(),
            algorithm = %algorithm,
            cursor = %format_date(&self.state.cursor),
            "Iteration budget exhausted without a qualifying date"
        );
        Err(ScheduleError::IterationLimitExceeded {
            limit: config.iteration_limit(),
        })
    }
}

fn out_of_range(date: &NaiveDateTime) -> ScheduleError {
    ScheduleError::DateOutOfRange(format_date(date))
}

impl ScheduleConfiguration {
    /// Return the best date under the configured [`Algorithm`].
    ///
    /// `from` defaults to [`today`] and `earliest` defaults to `from`. `earliest` bounds how far
    /// back *closest* strategies may look; it may precede `from`. An `earliest` later than
    /// `from` moves the start of the search up to `earliest`. Both are truncated to the start
    /// of day.
    ///
    /// The returned date is always available and never before `earliest`. If `from` is itself
    /// available and preferred, and not before `earliest`, it is returned unchanged.
    ///
    /// # Errors
    /// [`ScheduleError::IterationLimitExceeded`] if the iteration budget is spent without
    /// finding a qualifying date, or [`ScheduleError::DateOutOfRange`] if the search runs past
    /// the last representable date.
    pub fn next(
        &self,
        from: Option<NaiveDateTime>,
        earliest: Option<NaiveDateTime>,
    ) -> ScheduleResult<NaiveDateTime> {
        let from = from.map(|d| start_of_day(&d)).unwrap_or_else(today);
        let earliest = earliest.map(|d| start_of_day(&d)).unwrap_or(from);
        // nothing before `earliest` may be returned, so the search never starts below it
        let cursor = from.max(earliest);
        debug!(
            from = %format_date(&from),
            earliest = %format_date(&earliest),
            algorithm = %self.algorithm,
            "Searching for next date"
        );
        let mut search = Search::new(self, SearchState::new(cursor, earliest, self.iteration_limit));
        let date = search.run(self.algorithm)?;
        debug!(
            date = %format_date(&date),
            iterations = self.iteration_limit - search.state().budget.remaining(),
            "Found next date"
        );
        Ok(date)
    }

    /// Return the result of [`next`](ScheduleConfiguration::next) formatted as `"YYYY-MM-DD"`.
    pub fn next_as_string(
        &self,
        from: Option<NaiveDateTime>,
        earliest: Option<NaiveDateTime>,
    ) -> ScheduleResult<String> {
        self.next(from, earliest).map(|d| format_date(&d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::{create_preferred_calendar, ndt, ScheduleDefaults};
    use chrono::Weekday;

    fn mon_fri() -> Vec<Weekday> {
        vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
    }

    fn fixture_config(
        preferred: Option<Vec<Weekday>>,
        excluded: Vec<NaiveDateTime>,
        algorithm: Algorithm,
    ) -> ScheduleConfiguration {
        ScheduleConfiguration::try_new(mon_fri(), preferred, None, Some(excluded), algorithm)
            .unwrap()
    }

    #[test]
    fn test_budget_tick() {
        let mut budget = Budget::new(2);
        assert!(budget.tick());
        assert!(budget.tick());
        assert!(budget.is_exhausted());
        assert!(!budget.tick());
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_advance_to_preferred_steps_one_day() {
        let config = fixture_config(Some(vec![Weekday::Fri]), vec![], Algorithm::Default);
        let mut search =
            Search::new(&config, SearchState::new(ndt(2024, 1, 5), ndt(2024, 1, 5), 100));
        // a preferred cursor still moves on to the next preferred date
        assert!(search.advance_to_preferred().unwrap());
        assert_eq!(search.state().cursor, ndt(2024, 1, 12));
        assert_eq!(search.state().budget.remaining(), 93);
    }

    #[test]
    fn test_advance_to_preferred_skips_empty_months() {
        let config = ScheduleConfiguration::try_new(
            mon_fri(),
            None,
            Some(create_preferred_calendar(&[10], &[4])),
            Some(vec![]),
            Algorithm::OnlyPreferredDates,
        )
        .unwrap();
        let mut search =
            Search::new(&config, SearchState::new(ndt(2024, 1, 15), ndt(2024, 1, 15), 100));
        assert!(search.advance_to_preferred().unwrap());
        assert_eq!(search.state().cursor, ndt(2024, 4, 10));
        // Feb 1, Mar 1, Apr 1, then nine single days to Apr 10
        assert_eq!(search.state().budget.remaining(), 100 - 12);
    }

    #[test]
    fn test_advance_to_preferred_exhausted() {
        let config = fixture_config(Some(vec![Weekday::Fri]), vec![], Algorithm::Default);
        let mut search =
            Search::new(&config, SearchState::new(ndt(2024, 1, 6), ndt(2024, 1, 6), 3));
        assert!(!search.advance_to_preferred().unwrap());
        assert_eq!(search.state().cursor, ndt(2024, 1, 9));
        assert!(search.state().budget.is_exhausted());
    }

    #[test]
    fn test_backward_probe_restores_cursor_before_fallback() {
        // Wednesday to the preceding Monday contains no Friday; falls forward to Thursday
        let config = fixture_config(
            Some(vec![Weekday::Fri]),
            vec![],
            Algorithm::ClosestPreferredWorkday,
        );
        let mut search =
            Search::new(&config, SearchState::new(ndt(2024, 1, 10), ndt(2024, 1, 8), 100));
        assert_eq!(
            search.step(Algorithm::ClosestPreferredWorkday),
            Ok(Transition::Fallback(Algorithm::NextPreferredWorkday))
        );
        assert_eq!(search.state().cursor, ndt(2024, 1, 11));
        assert_eq!(search.state().lower_bound, ndt(2024, 1, 11));
    }

    #[test]
    fn test_dispatch_follows_fallback_chain() {
        // Saturday with the lower bound at Saturday: nothing behind, so the chain runs
        // Closest → NextPreferredThenClosest → settles on Monday
        let config = fixture_config(None, vec![], Algorithm::Default);
        let mut search =
            Search::new(&config, SearchState::new(ndt(2024, 1, 6), ndt(2024, 1, 6), 100));
        assert!(search.dispatch(Algorithm::Default).unwrap());
        assert_eq!(search.state().cursor, ndt(2024, 1, 8));
        assert_eq!(search.state().lower_bound, ndt(2024, 1, 7));
    }

    #[test]
    fn test_closest_standard_workday_exhausted_mid_probe() {
        let config = fixture_config(None, vec![], Algorithm::ClosestStandardWorkday);
        let mut search =
            Search::new(&config, SearchState::new(ndt(2024, 1, 7), ndt(2024, 1, 1), 1));
        // Sunday → Saturday costs the only step, Saturday is not available
        assert_eq!(
            search.step(Algorithm::ClosestStandardWorkday),
            Ok(Transition::Settled(false))
        );
        assert_eq!(search.state().cursor, ndt(2024, 1, 7));
    }

    #[test]
    fn test_next_preferred_then_closest_probes_back_from_preferred() {
        // preferred Friday is excluded, the closest available day before it is Thursday
        let config = fixture_config(
            Some(vec![Weekday::Fri]),
            vec![ndt(2024, 1, 12)],
            Algorithm::NextPreferredThenClosestStandardWorkday,
        );
        let result = config.next(Some(ndt(2024, 1, 8)), None).unwrap();
        assert_eq!(result, ndt(2024, 1, 11));
    }

    #[test]
    fn test_closest_strategy_without_room_steps_to_preferred_first() {
        // no room behind Wednesday, so the search starts from the next Friday
        let config = fixture_config(Some(vec![Weekday::Fri]), vec![], Algorithm::Default);
        let mut search =
            Search::new(&config, SearchState::new(ndt(2024, 1, 10), ndt(2024, 1, 10), 100));
        assert_eq!(search.run(Algorithm::Default).unwrap(), ndt(2024, 1, 12));

        // with room behind, the closest Friday back is taken
        let mut search =
            Search::new(&config, SearchState::new(ndt(2024, 1, 10), ndt(2024, 1, 1), 100));
        assert_eq!(search.run(Algorithm::Default).unwrap(), ndt(2024, 1, 5));
    }

    #[test]
    fn test_search_past_last_date_is_out_of_range() {
        let last = NaiveDate::MAX.and_time(NaiveTime::MIN);
        // the only workday is the one after the last representable date
        let config = ScheduleConfiguration::try_new(
            vec![last.weekday().succ()],
            None,
            None,
            Some(vec![]),
            Algorithm::NextStandardWorkday,
        )
        .unwrap();
        assert_eq!(
            config.next(Some(last), None),
            Err(ScheduleError::DateOutOfRange(format_date(&last)))
        );

        let mut search = Search::new(&config, SearchState::new(last, last, 100));
        assert!(search.advance_to_preferred().is_err());
        let mut search = Search::new(&config, SearchState::new(last, last, 100));
        assert!(search.dispatch(Algorithm::ClosestStandardWorkday).is_err());
    }

    #[test]
    fn test_next_as_string() {
        let config = fixture_config(None, vec![], Algorithm::NextStandardWorkday);
        assert_eq!(
            config.next_as_string(Some(ndt(2024, 1, 6)), None).unwrap(),
            "2024-01-08"
        );
    }

    #[test]
    fn test_time_of_day_is_normalized() {
        let config = fixture_config(None, vec![], Algorithm::NextStandardWorkday);
        let from =
            NaiveDateTime::parse_from_str("2024-01-08 16:45:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(config.next(Some(from), None).unwrap(), ndt(2024, 1, 8));
    }

    #[test]
    fn test_iteration_limit_exceeded() {
        let defaults = ScheduleDefaults {
            iteration_limit: 20,
            ..ScheduleDefaults::default()
        };
        let config = ScheduleConfiguration::try_new_with_defaults(
            vec![Weekday::Mon],
            None,
            None,
            Some(vec![ndt(2024, 1, 8), ndt(2024, 1, 15), ndt(2024, 1, 22)]),
            Algorithm::NextStandardWorkday,
            &defaults,
        )
        .unwrap();
        assert_eq!(
            config.next(Some(ndt(2024, 1, 6)), None),
            Err(ScheduleError::IterationLimitExceeded { limit: 20 })
        );
        // with enough budget the first free Monday is found
        let config = ScheduleConfiguration {
            iteration_limit: 40,
            ..config
        };
        assert_eq!(config.next(Some(ndt(2024, 1, 6)), None).unwrap(), ndt(2024, 1, 29));
    }
}
