//! Persistence boundary for vouchers.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use voucherbook_shared::types::{Amount, PageRequest, PageResponse, VoucherId};

use super::aggregate::Voucher;
use super::error::PersistenceError;
use super::types::{EntryMode, VoucherType};
use crate::fiscal::FiscalYear;

/// Filter for listing vouchers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherFilter {
    /// Only vouchers of this type.
    #[serde(default, rename = "type")]
    pub voucher_type: Option<VoucherType>,
    /// Only vouchers dated on or after this date.
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// Only vouchers dated on or before this date.
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

impl VoucherFilter {
    /// Returns true if the voucher passes the filter.
    #[must_use]
    pub fn matches(&self, voucher: &Voucher) -> bool {
        if self.voucher_type.is_some_and(|t| t != voucher.voucher_type) {
            return false;
        }
        match voucher.date {
            Some(date) => {
                self.date_from.is_none_or(|from| date >= from)
                    && self.date_to.is_none_or(|to| date <= to)
            }
            None => self.date_from.is_none() && self.date_to.is_none(),
        }
    }
}

/// One row of a voucher listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherSummary {
    /// Voucher id.
    pub id: VoucherId,
    /// Voucher date.
    pub date: Option<NaiveDate>,
    /// Voucher number.
    pub number: String,
    /// Voucher type.
    #[serde(rename = "type")]
    pub voucher_type: VoucherType,
    /// Entry mode.
    pub mode: EntryMode,
    /// Voucher narration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    /// Sum of debit lines.
    pub total_debit: Amount,
    /// Number of lines.
    pub line_count: usize,
}

impl From<&Voucher> for VoucherSummary {
    fn from(voucher: &Voucher) -> Self {
        Self {
            id: voucher.id,
            date: voucher.date,
            number: voucher.number.clone(),
            voucher_type: voucher.voucher_type,
            mode: voucher.mode(),
            narration: voucher.narration.clone(),
            total_debit: voucher.totals().total_debit,
            line_count: voucher.lines().len(),
        }
    }
}

/// Stores and retrieves validated vouchers.
///
/// Implementations must reject a second voucher with the same number, type and fiscal
/// year with `PersistenceError::DuplicateNumber`, atomically with the write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoucherRepository: Send + Sync {
    /// Stores a new voucher and returns its authoritative id.
    async fn create(&self, voucher: &Voucher) -> Result<VoucherId, PersistenceError>;

    /// Replaces an existing voucher.
    async fn update(&self, id: VoucherId, voucher: &Voucher) -> Result<(), PersistenceError>;

    /// Loads a voucher.
    async fn find(&self, id: VoucherId) -> Result<Option<Voucher>, PersistenceError>;

    /// Lists vouchers matching `filter`, newest date first.
    async fn list(
        &self,
        filter: &VoucherFilter,
        page: PageRequest,
    ) -> Result<PageResponse<VoucherSummary>, PersistenceError>;

    /// Numbers already used by vouchers of `voucher_type` dated within `year`.
    async fn numbers_in_fiscal_year(
        &self,
        voucher_type: VoucherType,
        year: &FiscalYear,
    ) -> Result<Vec<String>, PersistenceError>;
}
