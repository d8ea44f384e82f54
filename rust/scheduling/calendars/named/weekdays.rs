//! Define a generic Western working week, Monday to Friday.

pub const WORKDAYS: &[u8] = &[1, 2, 3, 4, 5]; // Saturday and Sunday weekend
