//! Submission-time validation of vouchers.
//!
//! The validator never fails fast: it walks the whole voucher and returns every problem
//! keyed by the form field it belongs to, so a caller can show all messages at once.
//! Running it twice on an unchanged voucher yields the same error set.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use super::aggregate::{MIN_LINES, Voucher};
use super::error::VoucherError;
use super::types::{Direction, VoucherTotals};
use crate::ledger::LedgerTable;

/// Form field a validation error is reported against.
///
/// Keys order the way the form reads: header fields, then each line's fields in line
/// order, then the balance and submission keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// Voucher date.
    Date,
    /// Voucher number.
    Number,
    /// The line set as a whole.
    Entries,
    /// Ledger of the line at the index.
    Ledger(usize),
    /// Amount of the line at the index.
    Amount(usize),
    /// Stock quantity of the line at the index.
    Quantity(usize),
    /// Ledger kind of the line at the index.
    LedgerKind(usize),
    /// Debit/credit balance.
    Balance,
    /// Form-level submission failure.
    Submission,
}

impl FieldKey {
    fn position(self) -> (u8, usize, u8) {
        match self {
            Self::Date => (0, 0, 0),
            Self::Number => (0, 0, 1),
            Self::Entries => (0, 0, 2),
            Self::Ledger(i) => (1, i, 0),
            Self::LedgerKind(i) => (1, i, 1),
            Self::Amount(i) => (1, i, 2),
            Self::Quantity(i) => (1, i, 3),
            Self::Balance => (2, 0, 0),
            Self::Submission => (2, 0, 1),
        }
    }
}

impl Ord for FieldKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.position().cmp(&other.position())
    }
}

impl PartialOrd for FieldKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => f.write_str("date"),
            Self::Number => f.write_str("number"),
            Self::Entries => f.write_str("entries"),
            Self::Ledger(i) => write!(f, "ledgerId{i}"),
            Self::Amount(i) => write!(f, "amount{i}"),
            Self::Quantity(i) => write!(f, "quantity{i}"),
            Self::LedgerKind(i) => write!(f, "ledgerKind{i}"),
            Self::Balance => f.write_str("balance"),
            Self::Submission => f.write_str("submit"),
        }
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Errors collected from one validation pass, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FieldKey, VoucherError>);

impl ValidationErrors {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error, replacing any earlier error for the same field.
    pub fn insert(&mut self, key: FieldKey, error: VoucherError) {
        self.0.insert(key, error);
    }

    /// Removes the error for a field.
    pub fn remove(&mut self, key: FieldKey) -> Option<VoucherError> {
        self.0.remove(&key)
    }

    /// Drops every error.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns true if no errors were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Error for a field.
    #[must_use]
    pub fn get(&self, key: FieldKey) -> Option<&VoucherError> {
        self.0.get(&key)
    }

    /// Returns true if the field has an error.
    #[must_use]
    pub fn contains(&self, key: FieldKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Fields with errors, in form order.
    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.0.keys().copied()
    }

    /// Errors in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &VoucherError)> {
        self.0.iter().map(|(key, error)| (*key, error))
    }
}

struct ErrorEntry<'a>(&'a VoucherError);

impl Serialize for ErrorEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let VoucherError::UnbalancedVoucher { debit, credit } = self.0 {
            let mut entry = serializer.serialize_struct("ErrorEntry", 4)?;
            entry.serialize_field("code", self.0.error_code())?;
            entry.serialize_field("message", &self.0.to_string())?;
            entry.serialize_field("totalDebit", debit)?;
            entry.serialize_field("totalCredit", credit)?;
            return entry.end();
        }
        let mut entry = serializer.serialize_struct("ErrorEntry", 2)?;
        entry.serialize_field("code", self.0.error_code())?;
        entry.serialize_field("message", &self.0.to_string())?;
        entry.end()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, error) in &self.0 {
            map.serialize_entry(key, &ErrorEntry(error))?;
        }
        map.end()
    }
}

/// Checks vouchers against the double-entry invariant and line completeness.
pub struct BalanceValidator;

impl BalanceValidator {
    /// Validates a voucher on its own.
    ///
    /// Checks, in order:
    /// 1. Header: date and number are present
    /// 2. Structure: at least two lines; single-entry holds one debit then one credit of
    ///    equal amount
    /// 3. Each line: ledger selected, `0 < amount <= Amount::MAX`, stock quantity > 0
    /// 4. Double-entry only: total debits == total credits
    ///
    /// Invalid lines still contribute their amounts to the totals.
    ///
    /// # Errors
    ///
    /// Returns every problem found, keyed by field.
    pub fn validate(voucher: &Voucher) -> Result<VoucherTotals, ValidationErrors> {
        Self::finish(voucher, Self::collect_errors(voucher))
    }

    /// Validates a voucher and also checks every selected ledger against the ledger master.
    ///
    /// Unknown ledgers are reported under `ledgerId<i>`; ledgers whose kind the voucher
    /// type does not allow under `ledgerKind<i>`.
    ///
    /// # Errors
    ///
    /// Returns every problem found, keyed by field.
    pub fn validate_with_ledgers(
        voucher: &Voucher,
        ledgers: &LedgerTable,
    ) -> Result<VoucherTotals, ValidationErrors> {
        let mut errors = Self::collect_errors(voucher);
        let allowed = voucher.voucher_type.allowed_ledger_kinds();

        for (line, entry) in voucher.lines().iter().enumerate() {
            if entry.ledger_id.is_blank() {
                continue;
            }
            match ledgers.get(&entry.ledger_id) {
                None => errors.insert(
                    FieldKey::Ledger(line),
                    VoucherError::UnknownLedger {
                        line,
                        ledger_id: entry.ledger_id.clone(),
                    },
                ),
                Some(ledger) => {
                    if allowed.is_some_and(|kinds| !kinds.contains(&ledger.kind)) {
                        errors.insert(
                            FieldKey::LedgerKind(line),
                            VoucherError::LedgerKindNotAllowed {
                                line,
                                voucher_type: voucher.voucher_type,
                                kind: ledger.kind,
                            },
                        );
                    }
                }
            }
        }

        Self::finish(voucher, errors)
    }

    /// Collects every error without deciding success.
    #[must_use]
    pub fn collect_errors(voucher: &Voucher) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if voucher.date.is_none() {
            errors.insert(FieldKey::Date, VoucherError::MissingDate);
        }
        if voucher.number.trim().is_empty() {
            errors.insert(FieldKey::Number, VoucherError::MissingNumber);
        }

        let lines = voucher.lines();
        if voucher.is_single_entry() {
            let well_formed = matches!(
                lines,
                [debit, credit]
                    if debit.direction == Direction::Debit
                        && credit.direction == Direction::Credit
                        && debit.amount == credit.amount
            );
            if !well_formed {
                errors.insert(FieldKey::Entries, VoucherError::MalformedSingleEntry);
            }
        } else if lines.len() < MIN_LINES {
            errors.insert(FieldKey::Entries, VoucherError::InsufficientLines);
        }

        for (line, entry) in lines.iter().enumerate() {
            if entry.ledger_id.is_blank() {
                errors.insert(FieldKey::Ledger(line), VoucherError::InvalidReference { line });
            }
            if !entry.amount.is_positive() || !entry.amount.is_within_limit() {
                errors.insert(
                    FieldKey::Amount(line),
                    VoucherError::InvalidAmount {
                        line,
                        amount: entry.amount,
                    },
                );
            }
            if let Some(item) = &entry.item
                && item.quantity <= rust_decimal::Decimal::ZERO
            {
                errors.insert(FieldKey::Quantity(line), VoucherError::InvalidQuantity { line });
            }
        }

        if !voucher.is_single_entry() {
            let totals = voucher.totals();
            if !totals.is_balanced {
                errors.insert(
                    FieldKey::Balance,
                    VoucherError::UnbalancedVoucher {
                        debit: totals.total_debit,
                        credit: totals.total_credit,
                    },
                );
            }
        }

        errors
    }

    fn finish(voucher: &Voucher, errors: ValidationErrors) -> Result<VoucherTotals, ValidationErrors> {
        if errors.is_empty() {
            Ok(voucher.totals())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use voucherbook_shared::types::{Amount, LedgerId};

    use crate::ledger::{LedgerKind, LedgerReference};
    use crate::voucher::field::LineField;
    use crate::voucher::types::{EntryMode, VoucherType};

    fn voucher_with(voucher_type: VoucherType, lines: &[(&str, &str, Direction)]) -> Voucher {
        let mut voucher = Voucher::new(
            voucher_type,
            NaiveDate::from_ymd_opt(2025, 4, 15),
            "PV100001",
        );
        while voucher.lines().len() < lines.len() {
            voucher.add_line().unwrap();
        }
        for (i, (ledger, amount, direction)) in lines.iter().enumerate() {
            voucher
                .apply_field_update(i, LineField::SetLedger(LedgerId::from(*ledger)))
                .unwrap();
            voucher
                .apply_field_update(i, LineField::SetAmount((*amount).to_string()))
                .unwrap();
            voucher
                .apply_field_update(i, LineField::SetDirection(*direction))
                .unwrap();
        }
        voucher
    }

    #[test]
    fn test_balanced_voucher_passes() {
        let voucher = voucher_with(
            VoucherType::Payment,
            &[("1", "500", Direction::Debit), ("2", "500", Direction::Credit)],
        );
        let totals = BalanceValidator::validate(&voucher).unwrap();
        assert_eq!(totals.total_debit, Amount::new(dec!(500)));
        assert!(totals.is_balanced);
    }

    #[test]
    fn test_unbalanced_voucher_reports_only_balance() {
        let voucher = voucher_with(
            VoucherType::Payment,
            &[("1", "500", Direction::Debit), ("2", "400", Direction::Credit)],
        );
        let errors = BalanceValidator::validate(&voucher).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(FieldKey::Balance),
            Some(&VoucherError::UnbalancedVoucher {
                debit: Amount::new(dec!(500)),
                credit: Amount::new(dec!(400)),
            })
        );
    }

    #[test]
    fn test_missing_ledger_still_counts_toward_totals() {
        let voucher = voucher_with(
            VoucherType::Payment,
            &[("", "500", Direction::Debit), ("2", "500", Direction::Credit)],
        );
        let errors = BalanceValidator::validate(&voucher).unwrap_err();
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec![FieldKey::Ledger(0)]);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let voucher = voucher_with(
            VoucherType::Journal,
            &[
                ("1", "500", Direction::Debit),
                ("2", "500", Direction::Credit),
                ("3", "0", Direction::Credit),
            ],
        );
        let errors = BalanceValidator::validate(&voucher).unwrap_err();
        assert!(errors.contains(FieldKey::Amount(2)));
        assert!(!errors.contains(FieldKey::Balance));
    }

    #[test]
    fn test_oversized_amounts_reported_not_panicking() {
        let voucher: Voucher = serde_json::from_str(
            r#"{
                "date": "2025-04-15",
                "number": "JV000001",
                "type": "journal",
                "lines": [
                    {"id": "1", "ledgerId": "1", "amount": "79228162514264337593543950335", "type": "debit"},
                    {"id": "2", "ledgerId": "2", "amount": "79228162514264337593543950335", "type": "debit"},
                    {"id": "3", "ledgerId": "3", "amount": "1", "type": "credit"}
                ]
            }"#,
        )
        .unwrap();

        let errors = BalanceValidator::validate(&voucher).unwrap_err();
        assert!(matches!(
            errors.get(FieldKey::Amount(0)),
            Some(VoucherError::InvalidAmount { line: 0, .. })
        ));
        assert!(errors.contains(FieldKey::Amount(1)));
        assert!(!errors.contains(FieldKey::Amount(2)));
        assert!(errors.contains(FieldKey::Balance));
    }

    #[test]
    fn test_amount_at_limit_balances() {
        let max = Amount::MAX.to_string();
        let voucher = voucher_with(
            VoucherType::Journal,
            &[("1", max.as_str(), Direction::Debit), ("2", max.as_str(), Direction::Credit)],
        );
        let totals = BalanceValidator::validate(&voucher).unwrap();
        assert_eq!(totals.total_debit, Amount::MAX);
    }

    #[test]
    fn test_errors_iterate_in_form_order() {
        let mut voucher = voucher_with(
            VoucherType::Journal,
            &[("", "0", Direction::Debit), ("", "0", Direction::Credit)],
        );
        voucher.date = None;
        let errors = BalanceValidator::validate(&voucher).unwrap_err();
        assert_eq!(
            errors.keys().collect::<Vec<_>>(),
            vec![
                FieldKey::Date,
                FieldKey::Ledger(0),
                FieldKey::Amount(0),
                FieldKey::Ledger(1),
                FieldKey::Amount(1),
            ]
        );
    }

    #[test]
    fn test_header_errors() {
        let mut voucher = voucher_with(
            VoucherType::Payment,
            &[("1", "10", Direction::Debit), ("2", "10", Direction::Credit)],
        );
        voucher.date = None;
        voucher.assign_number("  ");
        let errors = BalanceValidator::validate(&voucher).unwrap_err();
        assert!(errors.contains(FieldKey::Date));
        assert!(errors.contains(FieldKey::Number));
    }

    #[test]
    fn test_single_entry_requires_both_ledgers() {
        let mut voucher = Voucher::new(
            VoucherType::Receipt,
            NaiveDate::from_ymd_opt(2025, 4, 15),
            "RV100001",
        );
        voucher.set_mode(EntryMode::SingleEntry);
        voucher
            .apply_field_update(0, LineField::SetLedger(LedgerId::from("1")))
            .unwrap();
        voucher
            .apply_field_update(0, LineField::SetAmount("250".into()))
            .unwrap();

        let errors = BalanceValidator::validate(&voucher).unwrap_err();
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec![FieldKey::Ledger(1)]);
    }

    #[test]
    fn test_malformed_single_entry_payload() {
        let voucher = Voucher::new(
            VoucherType::Receipt,
            NaiveDate::from_ymd_opt(2025, 4, 15),
            "RV100001",
        )
        .with_lines(EntryMode::SingleEntry, vec![]);
        let errors = BalanceValidator::validate(&voucher).unwrap_err();
        assert_eq!(
            errors.get(FieldKey::Entries),
            Some(&VoucherError::MalformedSingleEntry)
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        let voucher = voucher_with(
            VoucherType::Payment,
            &[("", "0", Direction::Debit), ("2", "400", Direction::Credit)],
        );
        assert_eq!(
            BalanceValidator::validate(&voucher),
            BalanceValidator::validate(&voucher)
        );
    }

    #[test]
    fn test_exact_decimal_comparison() {
        let voucher = voucher_with(
            VoucherType::Journal,
            &[
                ("1", "0.1", Direction::Debit),
                ("2", "0.2", Direction::Debit),
                ("3", "0.3", Direction::Credit),
            ],
        );
        assert!(BalanceValidator::validate(&voucher).is_ok());
    }

    #[test]
    fn test_contra_rejects_party_ledger() {
        let ledgers: LedgerTable = [
            LedgerReference::new("1", "Cash", LedgerKind::Cash),
            LedgerReference::new("2", "Acme Traders", LedgerKind::Party),
        ]
        .into_iter()
        .collect();
        let voucher = voucher_with(
            VoucherType::Contra,
            &[("1", "100", Direction::Debit), ("2", "100", Direction::Credit)],
        );

        let errors = BalanceValidator::validate_with_ledgers(&voucher, &ledgers).unwrap_err();
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec![FieldKey::LedgerKind(1)]);
    }

    #[test]
    fn test_unknown_ledger_reported() {
        let ledgers: LedgerTable = [LedgerReference::new("1", "Cash", LedgerKind::Cash)]
            .into_iter()
            .collect();
        let voucher = voucher_with(
            VoucherType::Payment,
            &[("1", "100", Direction::Debit), ("9", "100", Direction::Credit)],
        );
        let errors = BalanceValidator::validate_with_ledgers(&voucher, &ledgers).unwrap_err();
        assert_eq!(errors.get(FieldKey::Ledger(1)).unwrap().error_code(), "INVALID_REFERENCE");
    }

    #[test]
    fn test_field_key_names() {
        assert_eq!(FieldKey::Ledger(0).to_string(), "ledgerId0");
        assert_eq!(FieldKey::Amount(3).to_string(), "amount3");
        assert_eq!(FieldKey::Balance.to_string(), "balance");
    }

    #[test]
    fn test_errors_serialize_with_totals() {
        let voucher = voucher_with(
            VoucherType::Payment,
            &[("1", "500", Direction::Debit), ("2", "400", Direction::Credit)],
        );
        let errors = BalanceValidator::validate(&voucher).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["balance"]["code"], "UNBALANCED_VOUCHER");
        assert_eq!(json["balance"]["totalDebit"], "500.00");
        assert_eq!(json["balance"]["totalCredit"], "400.00");
    }
}
