//! Define a working week which asserts every day of the week as a workday.

pub const WORKDAYS: &[u8] = &[0, 1, 2, 3, 4, 5, 6];
