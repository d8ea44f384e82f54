//! Define a Sunday to Thursday working week, common across the Middle East.

pub const WORKDAYS: &[u8] = &[0, 1, 2, 3, 4]; // Friday and Saturday weekend
