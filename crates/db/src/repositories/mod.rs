//! Repository implementations for data access.
//!
//! Repositories implement the persistence traits from `voucherbook-core`, hiding the
//! `SeaORM` details from the rest of the application.

pub mod ledger;
pub mod voucher;

pub use ledger::PgLedgerDirectory;
pub use voucher::PgVoucherRepository;

use sea_orm::{DbErr, SqlErr};
use voucherbook_core::voucher::PersistenceError;

/// Maps a database error onto the persistence taxonomy.
///
/// Connection failures become `Unreachable` so callers can tell "could not reach the
/// store" apart from a refused write.
pub(crate) fn db_error(err: &DbErr) -> PersistenceError {
    if let Some(SqlErr::ForeignKeyConstraintViolation(detail)) = err.sql_err() {
        return PersistenceError::Rejected(format!("unknown reference: {detail}"));
    }
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => PersistenceError::Unreachable(err.to_string()),
        _ => PersistenceError::Storage(err.to_string()),
    }
}
