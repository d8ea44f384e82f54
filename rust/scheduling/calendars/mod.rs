mod cal;
mod dateroll;
mod day;
mod named;

pub use crate::scheduling::calendars::{
    cal::Cal,
    dateroll::DateRoll,
    day::{
        first_of_next_month, format_date, ndt, next_day, parse_date, previous_day, start_of_day,
        today, weekday_from_ordinal, weekday_ordinal,
    },
    named::{
        get_workdays_by_name, preset_names, DEFAULT_EXCLUDED_DATES, DEFAULT_WORKDAYS,
    },
};
