//! Voucher error types.
//!
//! Validation failures are collected into a keyed error set rather than returned one at a
//! time; edit errors refuse a single mutation and leave the voucher unchanged; persistence
//! errors come back from the repository.

use thiserror::Error;
use voucherbook_shared::types::{Amount, LedgerId, VoucherId};

use super::types::{Direction, VoucherType};
use super::validation::ValidationErrors;
use crate::ledger::LedgerKind;

/// A single rule a voucher breaks at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoucherError {
    // ========== Header Errors ==========
    /// Voucher date is missing.
    #[error("Voucher date is required")]
    MissingDate,

    /// Voucher number is missing.
    #[error("Voucher number is required")]
    MissingNumber,

    /// Voucher holds fewer than two lines.
    #[error("Voucher must have at least 2 lines")]
    InsufficientLines,

    /// Single-entry voucher does not hold exactly one debit then one credit line.
    #[error(
        "Single-entry voucher must have exactly one debit line followed by one credit line of equal amount"
    )]
    MalformedSingleEntry,

    // ========== Line Errors ==========
    /// Line has no ledger selected.
    #[error("Line {line}: ledger is required")]
    InvalidReference {
        /// Line index.
        line: usize,
    },

    /// Line references a ledger the ledger master does not know.
    #[error("Line {line}: ledger {ledger_id} does not exist")]
    UnknownLedger {
        /// Line index.
        line: usize,
        /// The unknown ledger key.
        ledger_id: LedgerId,
    },

    /// Line amount is zero, negative, or past the largest storable amount.
    #[error("Line {line}: amount must be greater than zero and at most {max}, got {amount}", max = Amount::MAX)]
    InvalidAmount {
        /// Line index.
        line: usize,
        /// The offending amount.
        amount: Amount,
    },

    /// Stock allocation quantity is zero or negative.
    #[error("Line {line}: quantity must be greater than zero")]
    InvalidQuantity {
        /// Line index.
        line: usize,
    },

    /// Ledger kind may not take part in this voucher type.
    #[error("Line {line}: {kind} ledgers cannot be used on {voucher_type} vouchers")]
    LedgerKindNotAllowed {
        /// Line index.
        line: usize,
        /// Voucher type.
        voucher_type: VoucherType,
        /// Kind of the selected ledger.
        kind: LedgerKind,
    },

    // ========== Voucher Errors ==========
    /// Voucher is not balanced (debits != credits).
    #[error("Voucher is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedVoucher {
        /// Total debit amount.
        debit: Amount,
        /// Total credit amount.
        credit: Amount,
    },

    /// The repository refused the write.
    #[error(transparent)]
    PersistenceFailure(#[from] PersistenceError),
}

impl VoucherError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDate => "MISSING_DATE",
            Self::MissingNumber => "MISSING_NUMBER",
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::MalformedSingleEntry => "MALFORMED_SINGLE_ENTRY",
            Self::InvalidReference { .. } | Self::UnknownLedger { .. } => "INVALID_REFERENCE",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::LedgerKindNotAllowed { .. } => "LEDGER_KIND_NOT_ALLOWED",
            Self::UnbalancedVoucher { .. } => "UNBALANCED_VOUCHER",
            Self::PersistenceFailure(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::PersistenceFailure(err) => err.http_status_code(),
            _ => 400,
        }
    }
}

/// A refused edit. The voucher is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Line index does not exist.
    #[error("Line {index} does not exist (voucher has {len} lines)")]
    LineOutOfRange {
        /// Requested index.
        index: usize,
        /// Current number of lines.
        len: usize,
    },

    /// Line set is fixed in single-entry mode.
    #[error("Lines cannot be added or removed in single-entry mode")]
    SingleEntryLocked,

    /// Removing would leave fewer than two lines.
    #[error("A voucher must keep at least two lines")]
    MinimumLines,

    /// Line direction is fixed by single-entry mode.
    #[error("Line {index} must stay a {required:?} line in single-entry mode")]
    FixedDirection {
        /// Line index.
        index: usize,
        /// Direction the mode requires.
        required: Direction,
    },

    /// Amount input parsed to a negative value.
    #[error("Line {index}: amount cannot be negative, got {amount}")]
    NegativeAmount {
        /// Line index.
        index: usize,
        /// Parsed amount.
        amount: Amount,
    },

    /// Amount input is larger than any voucher line may carry.
    #[error("Line {index}: amount cannot exceed {max}", max = Amount::MAX)]
    AmountTooLarge {
        /// Line index.
        index: usize,
    },

    /// Field is hidden by the voucher's field configuration.
    #[error("Field {field} is not enabled for this voucher")]
    FieldDisabled {
        /// Field name.
        field: &'static str,
    },

    /// Voucher number is generated while auto numbering is on.
    #[error("Voucher number is generated automatically")]
    NumberLocked,

    /// Stock items only go on inventory vouchers.
    #[error("{voucher_type} vouchers do not carry stock items")]
    NotInventoryVoucher {
        /// Voucher type.
        voucher_type: VoucherType,
    },

    /// A submission is awaiting its response.
    #[error("Voucher is being submitted")]
    SubmissionInFlight,
}

impl EditError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LineOutOfRange { .. } => "LINE_OUT_OF_RANGE",
            Self::SingleEntryLocked => "SINGLE_ENTRY_LOCKED",
            Self::MinimumLines => "MINIMUM_LINES",
            Self::FixedDirection { .. } => "FIXED_DIRECTION",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::AmountTooLarge { .. } => "AMOUNT_TOO_LARGE",
            Self::FieldDisabled { .. } => "FIELD_DISABLED",
            Self::NumberLocked => "NUMBER_LOCKED",
            Self::NotInventoryVoucher { .. } => "NOT_INVENTORY_VOUCHER",
            Self::SubmissionInFlight => "SUBMISSION_IN_FLIGHT",
        }
    }
}

/// Errors reported by a voucher repository or ledger directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// Server-side validation refused the voucher.
    #[error("Voucher rejected: {0}")]
    Rejected(String),

    /// Another voucher of the same type already uses this number in the fiscal year.
    #[error("Voucher number {number} is already used for {voucher_type} vouchers")]
    DuplicateNumber {
        /// The clashing number.
        number: String,
        /// Voucher type.
        voucher_type: VoucherType,
    },

    /// Voucher does not exist.
    #[error("Voucher not found: {0}")]
    NotFound(VoucherId),

    /// The store could not be reached.
    #[error("Could not reach the voucher store: {0}")]
    Unreachable(String),

    /// Any other storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PersistenceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "VOUCHER_REJECTED",
            Self::DuplicateNumber { .. } => "DUPLICATE_NUMBER",
            Self::NotFound(_) => "VOUCHER_NOT_FOUND",
            Self::Unreachable(_) => "STORE_UNREACHABLE",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Rejected(_) => 422,
            Self::DuplicateNumber { .. } => 409,
            Self::NotFound(_) => 404,
            Self::Unreachable(_) => 503,
            Self::Storage(_) => 500,
        }
    }

    /// Returns true if the store could not be reached, as opposed to refusing the write.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }

    /// Returns true if the write clashed with an existing voucher number.
    #[must_use]
    pub fn is_duplicate_number(&self) -> bool {
        matches!(self, Self::DuplicateNumber { .. })
    }
}

/// Why a submission did not produce a stored voucher.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// Local validation failed; nothing was sent.
    #[error("Voucher has {} validation error(s)", .0.len())]
    Invalid(ValidationErrors),

    /// The repository refused the write or could not be reached.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Another submission of the same voucher is still awaiting its response.
    #[error("Voucher is already being submitted")]
    InFlight,
}

impl SubmitError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "VALIDATION_ERROR",
            Self::Persistence(err) => err.error_code(),
            Self::InFlight => "SUBMISSION_IN_FLIGHT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Invalid(_) => 400,
            Self::Persistence(err) => err.http_status_code(),
            Self::InFlight => 409,
        }
    }
}

impl From<ValidationErrors> for SubmitError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}
