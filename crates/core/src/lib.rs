//! Core business logic for Voucherbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All voucher types, editing rules, and the balance check live here; persistence is
//! reached only through the repository traits.
//!
//! # Modules
//!
//! - `voucher` - Voucher entry model, double-entry validation, numbering, submission
//! - `ledger` - Ledger master references and participation rules
//! - `fiscal` - Fiscal year calculation for voucher numbering

pub mod fiscal;
pub mod ledger;
pub mod voucher;
