//! Ledger reference types.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use voucherbook_shared::types::LedgerId;

/// Classification of a ledger that decides where it may appear on a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    /// Cash in hand.
    Cash,
    /// Bank account.
    Bank,
    /// Customer or supplier account.
    Party,
    /// Income account.
    Income,
    /// Expense account.
    Expense,
    /// Anything else (capital, duties, suspense...).
    Other,
}

impl LedgerKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 6] = [
        Self::Cash,
        Self::Bank,
        Self::Party,
        Self::Income,
        Self::Expense,
        Self::Other,
    ];

    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
            Self::Party => "party",
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Other => "other",
        }
    }

    /// Returns true for cash and bank ledgers.
    #[must_use]
    pub const fn is_cash_or_bank(self) -> bool {
        matches!(self, Self::Cash | Self::Bank)
    }
}

impl std::fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a ledger kind name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown ledger kind: {0}")]
pub struct UnknownLedgerKind(pub String);

impl std::str::FromStr for LedgerKind {
    type Err = UnknownLedgerKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownLedgerKind(s.to_string()))
    }
}

/// Parses a comma-separated kind filter such as `cash,bank`.
///
/// Empty segments are skipped, so an empty filter means "all kinds".
pub fn parse_kind_filter(filter: &str) -> Result<Vec<LedgerKind>, UnknownLedgerKind> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::parse)
        .collect()
}

/// A ledger as seen by voucher entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReference {
    /// Key in the ledger master.
    pub id: LedgerId,
    /// Display name.
    pub name: String,
    /// Ledger classification.
    pub kind: LedgerKind,
    /// Ledger group the account is filed under, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

impl LedgerReference {
    /// Creates a ledger reference without a group.
    #[must_use]
    pub fn new(id: impl Into<LedgerId>, name: impl Into<String>, kind: LedgerKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            group_name: None,
        }
    }
}
