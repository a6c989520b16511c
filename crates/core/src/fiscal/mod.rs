//! Fiscal year calculation.
//!
//! Voucher numbers are unique per voucher type within a fiscal year.

pub mod period;

pub use period::{FiscalCalendar, FiscalYear};
