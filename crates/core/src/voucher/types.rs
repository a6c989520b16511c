//! Voucher domain types.
//!
//! This module defines the enums that classify vouchers and their lines, and the
//! totals used for the balance check and for display.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use voucherbook_shared::types::Amount;

use crate::ledger::LedgerKind;

/// Side of a voucher line.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/income accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/income accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Debit line.
    Debit,
    /// Credit line.
    Credit,
}

impl Direction {
    /// Returns the other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Short ledger-book label ("Dr" / "Cr").
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Debit => "Dr",
            Self::Credit => "Cr",
        }
    }
}

/// How lines are entered on a voucher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryMode {
    /// Exactly one debit line followed by one credit line with equal amounts.
    SingleEntry,
    /// Two or more independently editable lines.
    #[default]
    DoubleEntry,
}

impl EntryMode {
    /// Direction a line must have at `index`, if the mode fixes it.
    #[must_use]
    pub const fn fixed_direction(self, index: usize) -> Option<Direction> {
        match (self, index) {
            (Self::SingleEntry, 0) => Some(Direction::Debit),
            (Self::SingleEntry, 1) => Some(Direction::Credit),
            _ => None,
        }
    }
}

/// Voucher type classification.
///
/// The type decides the number prefix, which ledgers may participate, and whether lines
/// may carry stock items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoucherType {
    /// Money paid out.
    Payment,
    /// Money received.
    Receipt,
    /// Transfer between cash and bank ledgers.
    Contra,
    /// Sales invoice.
    Sales,
    /// Purchase invoice.
    Purchase,
    /// Goods dispatched to a customer.
    DeliveryNote,
    /// Stock moved or transformed between items and godowns.
    StockJournal,
    /// General journal entry.
    Journal,
}

impl VoucherType {
    /// Every voucher type.
    pub const ALL: [Self; 8] = [
        Self::Payment,
        Self::Receipt,
        Self::Contra,
        Self::Sales,
        Self::Purchase,
        Self::DeliveryNote,
        Self::StockJournal,
        Self::Journal,
    ];

    /// Returns the wire name of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Receipt => "receipt",
            Self::Contra => "contra",
            Self::Sales => "sales",
            Self::Purchase => "purchase",
            Self::DeliveryNote => "delivery-note",
            Self::StockJournal => "stock-journal",
            Self::Journal => "journal",
        }
    }

    /// Two-letter prefix of generated voucher numbers.
    #[must_use]
    pub const fn number_prefix(self) -> &'static str {
        match self {
            Self::Payment => "PV",
            Self::Receipt => "RV",
            Self::Contra => "CV",
            Self::Sales => "SV",
            Self::Purchase => "PU",
            Self::DeliveryNote => "DN",
            Self::StockJournal => "SJ",
            Self::Journal => "JV",
        }
    }

    /// Returns true if lines of this type may carry stock item allocations.
    #[must_use]
    pub const fn affects_inventory(self) -> bool {
        matches!(
            self,
            Self::Sales | Self::Purchase | Self::DeliveryNote | Self::StockJournal
        )
    }

    /// Ledger kinds allowed on every line, or `None` when any ledger may be used.
    #[must_use]
    pub const fn allowed_ledger_kinds(self) -> Option<&'static [LedgerKind]> {
        match self {
            Self::Contra => Some(&[LedgerKind::Cash, LedgerKind::Bank]),
            _ => None,
        }
    }
}

impl std::fmt::Display for VoucherType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a voucher type name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown voucher type: {0}")]
pub struct UnknownVoucherType(pub String);

impl std::str::FromStr for VoucherType {
    type Err = UnknownVoucherType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| UnknownVoucherType(s.to_string()))
    }
}

/// Voucher totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherTotals {
    /// Sum of debit line amounts.
    pub total_debit: Amount,
    /// Sum of credit line amounts.
    pub total_credit: Amount,
    /// Whether the voucher is balanced (debits == credits).
    pub is_balanced: bool,
}

impl VoucherTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(total_debit: Amount, total_credit: Amount) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Amount {
        self.total_debit - self.total_credit
    }
}
