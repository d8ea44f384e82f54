//! Define a weekend-only working week, Saturday and Sunday.

pub const WORKDAYS: &[u8] = &[0, 6];
