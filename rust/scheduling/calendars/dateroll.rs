use chrono::prelude::*;
use chrono::Days;

/// Simple date classification defining workdays, excluded dates and available days.
pub trait DateRoll {
    /// Returns whether the date falls on one of the standard workdays of the week.
    fn is_weekday(&self, date: &NaiveDateTime) -> bool;

    /// Returns whether the date is a specific excluded date (holiday or blackout).
    fn is_holiday(&self, date: &NaiveDateTime) -> bool;

    /// Returns whether the date is available, i.e. a standard workday and not excluded.
    fn is_bus_day(&self, date: &NaiveDateTime) -> bool {
        self.is_weekday(date) && !self.is_holiday(date)
    }

    /// Returns whether the date is not available.
    fn is_non_bus_day(&self, date: &NaiveDateTime) -> bool {
        !self.is_bus_day(date)
    }

    /// Return a vector of calendar dates between a start and end, inclusive.
    fn cal_date_range(&self, start: &NaiveDateTime, end: &NaiveDateTime) -> Vec<NaiveDateTime> {
        let mut vec = Vec::new();
        let mut sample_date = *start;
        while sample_date <= *end {
            vec.push(sample_date);
            match sample_date.checked_add_days(Days::new(1)) {
                Some(d) => sample_date = d,
                None => break,
            }
        }
        vec
    }

    /// Return a vector of available dates between a start and end, inclusive.
    fn bus_date_range(&self, start: &NaiveDateTime, end: &NaiveDateTime) -> Vec<NaiveDateTime> {
        self.cal_date_range(start, end)
            .into_iter()
            .filter(|d| self.is_bus_day(d))
            .collect()
    }

    /// Print a representation of the month of the object.
    fn print_month(&self, year: i32, month: u32) -> String {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return String::new();
        };
        let mut output = format!("{:>15} {}\n", first.format("%B").to_string(), year);
        output += "Su Mo Tu We Th Fr Sa\n";

        let idx_start = first.weekday().num_days_from_sunday() as usize;
        let mut arr: [String; 42] = std::array::from_fn(|_| String::from("  "));
        let mut day = first;
        while day.month() == month {
            let date = day.and_time(NaiveTime::MIN);
            let s = if self.is_bus_day(&date) {
                format!("{:>2}", day.day())
            } else if self.is_holiday(&date) {
                " *".to_string()
            } else {
                " .".to_string()
            };
            arr[day.day0() as usize + idx_start] = s;
            match day.succ_opt() {
                Some(d) => day = d,
                None => break,
            }
        }

        for row in arr.chunks(7) {
            output += &row.join(" ");
            output += "\n";
        }
        output += "Legend: '1-31' available day, '.' non-workday, '*' excluded date\n";
        output
    }
}
