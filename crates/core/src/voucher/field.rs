//! Field updates applied to a voucher while it is being entered.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use voucherbook_shared::types::{CostCentreId, LedgerId};

use super::line::ItemAllocation;
use super::types::Direction;

/// An edit to one field of a voucher line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum LineField {
    /// Select the ledger.
    SetLedger(LedgerId),
    /// Amount as typed; non-numeric input counts as zero.
    SetAmount(String),
    /// Debit or credit.
    SetDirection(Direction),
    /// Line narration.
    SetNarration(Option<String>),
    /// Cost centre.
    SetCostCentre(Option<CostCentreId>),
    /// Bank the cheque is drawn on.
    SetBankName(Option<String>),
    /// Cheque number.
    SetChequeNumber(Option<String>),
    /// Stock allocation.
    SetItem(Option<ItemAllocation>),
}

impl LineField {
    /// Validation key suffix the field reports errors under, if any.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetLedger(_) => "ledgerId",
            Self::SetAmount(_) => "amount",
            Self::SetDirection(_) => "direction",
            Self::SetNarration(_) => "narration",
            Self::SetCostCentre(_) => "costCentreId",
            Self::SetBankName(_) => "bankName",
            Self::SetChequeNumber(_) => "chequeNumber",
            Self::SetItem(_) => "item",
        }
    }
}

/// An edit to a voucher header field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum HeaderField {
    /// Voucher date.
    SetDate(Option<NaiveDate>),
    /// Voucher number; refused while auto numbering is on.
    SetNumber(String),
    /// Reference number.
    SetReferenceNo(Option<String>),
    /// Reference date.
    SetReferenceDate(Option<NaiveDate>),
    /// Voucher narration.
    SetNarration(Option<String>),
}

impl HeaderField {
    /// Field name as it appears on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetDate(_) => "date",
            Self::SetNumber(_) => "number",
            Self::SetReferenceNo(_) => "referenceNo",
            Self::SetReferenceDate(_) => "referenceDate",
            Self::SetNarration(_) => "narration",
        }
    }
}
