//! Define a six day working week, Monday to Saturday.

pub const WORKDAYS: &[u8] = &[1, 2, 3, 4, 5, 6]; // Sunday only weekend
