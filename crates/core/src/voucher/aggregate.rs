//! The voucher aggregate: header fields plus an ordered set of lines.
//!
//! Every mutation goes through a method that either applies completely or returns an
//! `EditError` and leaves the voucher untouched. Single-entry vouchers always hold exactly
//! one debit line followed by one credit line whose amounts move together.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use voucherbook_shared::config::VoucherFieldConfig;
use voucherbook_shared::types::{Amount, VoucherId};

use super::error::EditError;
use super::field::{HeaderField, LineField};
use super::line::VoucherLine;
use super::types::{Direction, EntryMode, VoucherTotals, VoucherType};
use crate::ledger::{LedgerKind, LedgerTable};

/// Minimum number of lines on any voucher.
pub const MIN_LINES: usize = 2;

/// A voucher being entered, or one loaded from the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    /// Identifier. Client-generated before persistence; the repository's is authoritative.
    #[serde(default)]
    pub id: VoucherId,
    /// Voucher date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Human-visible voucher number.
    #[serde(default)]
    pub number: String,
    /// Voucher type.
    #[serde(rename = "type")]
    pub voucher_type: VoucherType,
    /// Reference number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_no: Option<String>,
    /// Reference date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
    /// Voucher narration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    /// Optional fields this voucher shows.
    #[serde(default)]
    pub config: VoucherFieldConfig,
    #[serde(default)]
    mode: EntryMode,
    #[serde(alias = "entries")]
    lines: Vec<VoucherLine>,
}

impl Voucher {
    /// Creates a double-entry voucher with one blank debit and one blank credit line.
    #[must_use]
    pub fn new(voucher_type: VoucherType, date: Option<NaiveDate>, number: impl Into<String>) -> Self {
        Self {
            id: VoucherId::new(),
            date,
            number: number.into(),
            voucher_type,
            reference_no: None,
            reference_date: None,
            narration: None,
            config: VoucherFieldConfig::default(),
            mode: EntryMode::DoubleEntry,
            lines: fresh_lines(),
        }
    }

    /// Replaces the field configuration, dropping values it hides.
    #[must_use]
    pub fn with_config(mut self, config: VoucherFieldConfig) -> Self {
        self.set_config(config);
        self
    }

    /// Restores a mode and line set, e.g. when loading a stored voucher.
    ///
    /// No structural checks are made here; the validator reports malformed line sets.
    #[must_use]
    pub fn with_lines(mut self, mode: EntryMode, lines: Vec<VoucherLine>) -> Self {
        self.mode = mode;
        self.lines = lines;
        self
    }

    /// Entry mode.
    #[must_use]
    pub const fn mode(&self) -> EntryMode {
        self.mode
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[VoucherLine] {
        &self.lines
    }

    /// Line at `index`.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&VoucherLine> {
        self.lines.get(index)
    }

    /// Returns true in single-entry mode.
    #[must_use]
    pub fn is_single_entry(&self) -> bool {
        self.mode == EntryMode::SingleEntry
    }

    /// Appends a blank credit line.
    ///
    /// # Errors
    ///
    /// Returns `EditError::SingleEntryLocked` in single-entry mode.
    pub fn add_line(&mut self) -> Result<&VoucherLine, EditError> {
        if self.is_single_entry() {
            return Err(EditError::SingleEntryLocked);
        }
        let id = self.next_line_id();
        self.lines.push(VoucherLine::blank(id, Direction::Credit));
        let last = self.lines.len() - 1;
        Ok(&self.lines[last])
    }

    /// Removes the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error in single-entry mode, when `index` is out of range, or when fewer
    /// than two lines would remain.
    pub fn remove_line(&mut self, index: usize) -> Result<VoucherLine, EditError> {
        if self.is_single_entry() {
            return Err(EditError::SingleEntryLocked);
        }
        self.check_index(index)?;
        if self.lines.len() <= MIN_LINES {
            return Err(EditError::MinimumLines);
        }
        Ok(self.lines.remove(index))
    }

    /// Switches the entry mode.
    ///
    /// Switching to single-entry replaces the lines with a fresh blank debit/credit pair.
    /// Switching to double-entry keeps the lines as they are.
    pub fn set_mode(&mut self, mode: EntryMode) {
        if mode == EntryMode::SingleEntry {
            self.lines = fresh_lines();
        }
        self.mode = mode;
    }

    /// Applies an edit to one line.
    ///
    /// In single-entry mode an amount edit on either line is copied to the other line, and
    /// directions are fixed by position.
    ///
    /// # Errors
    ///
    /// Returns an `EditError` if the edit is refused; the voucher is unchanged.
    pub fn apply_field_update(&mut self, index: usize, field: LineField) -> Result<(), EditError> {
        self.check_index(index)?;
        let config = self.config;
        let fixed = self.mode.fixed_direction(index);

        match field {
            LineField::SetAmount(input) if self.is_single_entry() => {
                let amount = self.lines[index].set_amount(index, &input)?;
                let other = 1 - index.min(1);
                if let Some(line) = self.lines.get_mut(other) {
                    line.amount = amount;
                }
            }
            LineField::SetAmount(input) => {
                self.lines[index].set_amount(index, &input)?;
            }
            LineField::SetLedger(ledger_id) => self.lines[index].set_ledger(ledger_id),
            LineField::SetDirection(direction) => match fixed {
                Some(required) if required != direction => {
                    return Err(EditError::FixedDirection { index, required });
                }
                _ => self.lines[index].direction = direction,
            },
            LineField::SetNarration(value) => {
                require(config.show_entry_narration, value.is_some(), "narration")?;
                self.lines[index].narration = value;
            }
            LineField::SetCostCentre(value) => {
                require(config.show_cost_centre, value.is_some(), "costCentreId")?;
                self.lines[index].cost_centre_id = value;
            }
            LineField::SetBankName(value) => {
                require(config.show_bank_details, value.is_some(), "bankName")?;
                self.lines[index].bank_name = value;
            }
            LineField::SetChequeNumber(value) => {
                require(config.show_bank_details, value.is_some(), "chequeNumber")?;
                self.lines[index].cheque_number = value;
            }
            LineField::SetItem(value) => {
                if value.is_some() && !self.voucher_type.affects_inventory() {
                    return Err(EditError::NotInventoryVoucher {
                        voucher_type: self.voucher_type,
                    });
                }
                self.lines[index].item = value;
            }
        }
        Ok(())
    }

    /// Applies an edit to a header field.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NumberLocked` when the number is edited under auto numbering, or
    /// `EditError::FieldDisabled` for reference fields the configuration hides.
    pub fn apply_header_update(&mut self, field: HeaderField) -> Result<(), EditError> {
        match field {
            HeaderField::SetDate(date) => self.date = date,
            HeaderField::SetNumber(number) => {
                if self.config.auto_numbering {
                    return Err(EditError::NumberLocked);
                }
                self.number = number;
            }
            HeaderField::SetReferenceNo(value) => {
                require(self.config.show_reference, value.is_some(), "referenceNo")?;
                self.reference_no = value;
            }
            HeaderField::SetReferenceDate(value) => {
                require(self.config.show_reference, value.is_some(), "referenceDate")?;
                self.reference_date = value;
            }
            HeaderField::SetNarration(value) => self.narration = value,
        }
        Ok(())
    }

    /// Sets a generated voucher number, bypassing the auto-numbering lock.
    pub fn assign_number(&mut self, number: impl Into<String>) {
        self.number = number.into();
    }

    /// Replaces the field configuration and drops values it hides.
    pub fn set_config(&mut self, config: VoucherFieldConfig) {
        self.config = config;
        self.strip_hidden();
    }

    /// Drops values the configuration hides and stock items on non-inventory vouchers.
    pub fn strip_hidden(&mut self) {
        if !self.config.show_reference {
            self.reference_no = None;
            self.reference_date = None;
        }
        let inventory = self.voucher_type.affects_inventory();
        for line in &mut self.lines {
            line.strip_hidden(&self.config);
            if !inventory {
                line.item = None;
            }
        }
    }

    /// Drops bank details from lines whose ledger is known and is not a bank ledger.
    pub fn strip_bank_details(&mut self, ledgers: &LedgerTable) {
        for line in &mut self.lines {
            if ledgers
                .kind_of(&line.ledger_id)
                .is_some_and(|kind| kind != LedgerKind::Bank)
            {
                line.clear_bank_details();
            }
        }
    }

    /// Debit and credit totals over every line, valid or not.
    #[must_use]
    pub fn totals(&self) -> VoucherTotals {
        let (debit, credit) = self.lines.iter().fold(
            (Amount::ZERO, Amount::ZERO),
            |(debit, credit), line| match line.direction {
                Direction::Debit => (debit + line.amount, credit),
                Direction::Credit => (debit, credit + line.amount),
            },
        );
        VoucherTotals::new(debit, credit)
    }

    fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index < self.lines.len() {
            Ok(())
        } else {
            Err(EditError::LineOutOfRange {
                index,
                len: self.lines.len(),
            })
        }
    }

    fn next_line_id(&self) -> String {
        let max = self
            .lines
            .iter()
            .filter_map(|line| line.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        max.saturating_add(1).to_string()
    }
}

fn fresh_lines() -> Vec<VoucherLine> {
    vec![
        VoucherLine::blank("1", Direction::Debit),
        VoucherLine::blank("2", Direction::Credit),
    ]
}

fn require(enabled: bool, setting: bool, field: &'static str) -> Result<(), EditError> {
    if setting && !enabled {
        Err(EditError::FieldDisabled { field })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use voucherbook_shared::types::{CostCentreId, LedgerId, StockItemId};

    use crate::ledger::LedgerReference;
    use crate::voucher::line::ItemAllocation;

    fn payment() -> Voucher {
        Voucher::new(
            VoucherType::Payment,
            NaiveDate::from_ymd_opt(2025, 6, 1),
            "PV123456",
        )
    }

    fn amount(value: rust_decimal::Decimal) -> Amount {
        Amount::new(value)
    }

    #[test]
    fn test_new_voucher_has_blank_pair() {
        let voucher = payment();
        assert_eq!(voucher.mode(), EntryMode::DoubleEntry);
        assert_eq!(voucher.lines().len(), 2);
        assert_eq!(voucher.lines()[0].direction, Direction::Debit);
        assert_eq!(voucher.lines()[1].direction, Direction::Credit);
        assert!(voucher.lines().iter().all(VoucherLine::is_blank));
    }

    #[test]
    fn test_add_line_appends_blank_credit() {
        let mut voucher = payment();
        let line = voucher.add_line().unwrap();
        assert_eq!(line.direction, Direction::Credit);
        assert_eq!(line.id, "3");
        assert_eq!(voucher.lines().len(), 3);
    }

    #[test]
    fn test_line_ids_stay_unique_after_removal() {
        let mut voucher = payment();
        voucher.add_line().unwrap();
        voucher.add_line().unwrap();
        voucher.remove_line(2).unwrap();
        let added = voucher.add_line().unwrap().id.clone();
        assert_eq!(added, "5");
    }

    #[test]
    fn test_add_line_refused_in_single_entry() {
        let mut voucher = payment();
        voucher.set_mode(EntryMode::SingleEntry);
        assert_eq!(voucher.add_line().unwrap_err(), EditError::SingleEntryLocked);
        assert_eq!(voucher.lines().len(), 2);
    }

    #[test]
    fn test_remove_line_keeps_minimum() {
        let mut voucher = payment();
        assert_eq!(voucher.remove_line(0).unwrap_err(), EditError::MinimumLines);
        voucher.add_line().unwrap();
        let removed = voucher.remove_line(0).unwrap();
        assert_eq!(removed.direction, Direction::Debit);
        assert_eq!(voucher.lines().len(), 2);
    }

    #[test]
    fn test_remove_line_out_of_range() {
        let mut voucher = payment();
        voucher.add_line().unwrap();
        assert_eq!(
            voucher.remove_line(7).unwrap_err(),
            EditError::LineOutOfRange { index: 7, len: 3 }
        );
    }

    #[test]
    fn test_switch_to_single_entry_resets_lines() {
        let mut voucher = payment();
        voucher.add_line().unwrap();
        voucher
            .apply_field_update(0, LineField::SetAmount("100".into()))
            .unwrap();
        voucher.set_mode(EntryMode::SingleEntry);

        assert_eq!(voucher.lines().len(), 2);
        assert_eq!(voucher.lines()[0].direction, Direction::Debit);
        assert_eq!(voucher.lines()[1].direction, Direction::Credit);
        assert!(voucher.lines().iter().all(VoucherLine::is_blank));
    }

    #[test]
    fn test_switch_to_double_entry_keeps_lines() {
        let mut voucher = payment();
        voucher.set_mode(EntryMode::SingleEntry);
        voucher
            .apply_field_update(0, LineField::SetLedger(LedgerId::from("7")))
            .unwrap();
        let before = voucher.lines().to_vec();
        voucher.set_mode(EntryMode::DoubleEntry);
        assert_eq!(voucher.lines(), before.as_slice());
    }

    #[test]
    fn test_single_entry_amount_sync_both_ways() {
        let mut voucher = payment();
        voucher.set_mode(EntryMode::SingleEntry);

        voucher
            .apply_field_update(1, LineField::SetAmount("1200".into()))
            .unwrap();
        assert_eq!(voucher.lines()[0].amount, amount(dec!(1200)));

        voucher
            .apply_field_update(0, LineField::SetAmount("75.5".into()))
            .unwrap();
        assert_eq!(voucher.lines()[1].amount, amount(dec!(75.50)));
        assert!(voucher.totals().is_balanced);
    }

    #[test]
    fn test_double_entry_amounts_are_independent() {
        let mut voucher = payment();
        voucher
            .apply_field_update(0, LineField::SetAmount("500".into()))
            .unwrap();
        assert_eq!(voucher.lines()[1].amount, Amount::ZERO);
    }

    #[test]
    fn test_single_entry_direction_is_fixed() {
        let mut voucher = payment();
        voucher.set_mode(EntryMode::SingleEntry);
        assert_eq!(
            voucher
                .apply_field_update(0, LineField::SetDirection(Direction::Credit))
                .unwrap_err(),
            EditError::FixedDirection {
                index: 0,
                required: Direction::Debit,
            }
        );
        voucher
            .apply_field_update(1, LineField::SetDirection(Direction::Credit))
            .unwrap();
    }

    #[test]
    fn test_double_entry_direction_is_editable() {
        let mut voucher = payment();
        voucher
            .apply_field_update(0, LineField::SetDirection(Direction::Credit))
            .unwrap();
        assert_eq!(voucher.lines()[0].direction, Direction::Credit);
    }

    #[test]
    fn test_hidden_fields_are_refused() {
        let mut voucher = payment();
        assert_eq!(
            voucher
                .apply_field_update(0, LineField::SetCostCentre(Some(CostCentreId::from("CC1"))))
                .unwrap_err(),
            EditError::FieldDisabled {
                field: "costCentreId"
            }
        );
        voucher
            .apply_field_update(0, LineField::SetBankName(Some("HDFC".into())))
            .unwrap();
        voucher
            .apply_field_update(0, LineField::SetCostCentre(None))
            .unwrap();
    }

    #[test]
    fn test_set_config_strips_hidden_values() {
        let mut voucher = payment();
        voucher.reference_no = Some("INV-9".into());
        voucher
            .apply_field_update(0, LineField::SetChequeNumber(Some("000111".into())))
            .unwrap();
        voucher.set_config(VoucherFieldConfig {
            show_reference: false,
            show_bank_details: false,
            ..VoucherFieldConfig::default()
        });
        assert_eq!(voucher.reference_no, None);
        assert_eq!(voucher.lines()[0].cheque_number, None);
    }

    #[test]
    fn test_number_locked_under_auto_numbering() {
        let mut voucher = payment();
        assert_eq!(
            voucher
                .apply_header_update(HeaderField::SetNumber("X1".into()))
                .unwrap_err(),
            EditError::NumberLocked
        );
        voucher.set_config(VoucherFieldConfig {
            auto_numbering: false,
            ..VoucherFieldConfig::default()
        });
        voucher
            .apply_header_update(HeaderField::SetNumber("X1".into()))
            .unwrap();
        assert_eq!(voucher.number, "X1");
    }

    #[test]
    fn test_item_only_on_inventory_vouchers() {
        let item = ItemAllocation {
            stock_item_id: StockItemId::from("SKU-1"),
            godown_id: None,
            quantity: dec!(3),
            rate: None,
        };
        let mut voucher = payment();
        assert!(matches!(
            voucher.apply_field_update(0, LineField::SetItem(Some(item.clone()))),
            Err(EditError::NotInventoryVoucher { .. })
        ));

        let mut sales = Voucher::new(VoucherType::Sales, None, "SV100001");
        sales
            .apply_field_update(1, LineField::SetItem(Some(item.clone())))
            .unwrap();
        assert_eq!(sales.lines()[1].item, Some(item));
    }

    #[test]
    fn test_bank_details_kept_only_on_bank_ledgers() {
        let mut voucher = Voucher::new(VoucherType::Contra, None, "CV100001");
        for (i, ledger) in ["1", "2"].into_iter().enumerate() {
            voucher
                .apply_field_update(i, LineField::SetLedger(LedgerId::from(ledger)))
                .unwrap();
            voucher
                .apply_field_update(i, LineField::SetBankName(Some("HDFC".into())))
                .unwrap();
            voucher
                .apply_field_update(i, LineField::SetChequeNumber(Some("000451".into())))
                .unwrap();
        }
        let ledgers: LedgerTable = [
            LedgerReference::new("1", "Cash", LedgerKind::Cash),
            LedgerReference::new("2", "HDFC Bank", LedgerKind::Bank),
        ]
        .into_iter()
        .collect();

        voucher.strip_bank_details(&ledgers);
        assert_eq!(voucher.lines()[0].bank_name, None);
        assert_eq!(voucher.lines()[0].cheque_number, None);
        assert_eq!(voucher.lines()[1].bank_name.as_deref(), Some("HDFC"));
        assert_eq!(voucher.lines()[1].cheque_number.as_deref(), Some("000451"));
    }

    #[test]
    fn test_field_update_out_of_range() {
        let mut voucher = payment();
        assert_eq!(
            voucher
                .apply_field_update(5, LineField::SetAmount("1".into()))
                .unwrap_err(),
            EditError::LineOutOfRange { index: 5, len: 2 }
        );
    }

    #[test]
    fn test_deserialize_with_entries_alias() {
        let voucher: Voucher = serde_json::from_str(
            r#"{
                "date": "2025-06-01",
                "number": "CV100200",
                "type": "contra",
                "mode": "single-entry",
                "entries": [
                    {"id": "1", "ledgerId": "1", "amount": 500, "type": "debit"},
                    {"id": "2", "ledgerId": "2", "amount": 500, "type": "credit"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(voucher.voucher_type, VoucherType::Contra);
        assert!(voucher.is_single_entry());
        assert_eq!(voucher.lines().len(), 2);
        assert!(voucher.totals().is_balanced);
    }
}
