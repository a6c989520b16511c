//! Ledger master references.
//!
//! Vouchers never own ledgers; a line holds only the ledger key. This module defines the
//! lookup table a form loads from the ledger master and the trait that provides it.

pub mod directory;
pub mod types;

pub use directory::{LedgerDirectory, LedgerTable};
pub use types::{LedgerKind, LedgerReference, UnknownLedgerKind, parse_kind_filter};
