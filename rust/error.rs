use thiserror::Error;

/// Errors raised when building a schedule or searching it for a date.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScheduleError {
    /// A construction invariant was violated. Never raised once a configuration exists.
    #[error("invalid schedule configuration: {0}")]
    Configuration(String),

    /// The shared probe budget ran out before a qualifying date was found.
    #[error(
        "no qualifying date found within {limit} iterations; the schedule is likely \
         misconfigured (e.g. every workday is excluded)"
    )]
    IterationLimitExceeded { limit: u32 },

    /// The search stepped past the last date the calendar can represent.
    #[error("no date follows '{0}' within the supported calendar range")]
    DateOutOfRange(String),

    #[error("cannot parse '{0}' as a date, expected 'YYYY-MM-DD' or 'today'")]
    DateParse(String),

    #[error("'{0}' is not found in list of existing workday presets")]
    UnknownPreset(String),

    #[error("'{0}' is not a known search algorithm")]
    UnknownAlgorithm(String),

    #[error("weekday ordinal {0} is out of range, expected 0 (Sunday) to 6 (Saturday)")]
    InvalidWeekday(u8),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
