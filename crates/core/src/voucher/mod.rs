//! Double-entry voucher entry.
//!
//! This module implements the voucher model shared by every voucher type:
//! - Voucher lines (debits and credits against ledgers)
//! - The voucher aggregate and its line-set operations
//! - Tagged field updates, including the single-entry amount sync
//! - Balance validation producing a field-keyed error set
//! - Voucher numbering
//! - Edit sessions guarding against duplicate submission
//! - The repository trait and the submission service

pub mod aggregate;
pub mod error;
pub mod field;
pub mod line;
pub mod numbering;
pub mod repository;
pub mod service;
pub mod session;
pub mod types;
pub mod validation;

#[cfg(test)]
mod aggregate_props;
#[cfg(test)]
mod validation_props;

pub use aggregate::Voucher;
pub use error::{EditError, PersistenceError, SubmitError, VoucherError};
pub use field::{HeaderField, LineField};
pub use line::{ItemAllocation, VoucherLine};
pub use numbering::{generate_voucher_number, next_sequential_number};
pub use repository::{VoucherFilter, VoucherRepository, VoucherSummary};
pub use service::VoucherService;
pub use session::{EditSession, SubmitResolution, SubmitTicket};
pub use types::{Direction, EntryMode, VoucherTotals, VoucherType};
pub use validation::{BalanceValidator, FieldKey, ValidationErrors};
pub use voucherbook_shared::config::{NumberingScheme, VoucherFieldConfig};
