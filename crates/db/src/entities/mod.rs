//! `SeaORM` entity definitions.

pub mod ledgers;
pub mod voucher_lines;
pub mod vouchers;
