//! Property-based tests for the balance validator.

use chrono::NaiveDate;
use proptest::prelude::*;
use voucherbook_shared::types::{Amount, LedgerId};

use super::aggregate::Voucher;
use super::field::LineField;
use super::types::{Direction, VoucherType};
use super::validation::{BalanceValidator, FieldKey};

/// Strategy to generate a positive amount in minor units (0.01 to 1,000,000.00).
fn positive_minor() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy to generate a line: (ledger selected, amount in minor units, direction).
fn line_strategy() -> impl Strategy<Value = (bool, i64, Direction)> {
    (
        prop::bool::weighted(0.9),
        prop_oneof![9 => positive_minor(), 1 => Just(0i64)],
        prop_oneof![Just(Direction::Debit), Just(Direction::Credit)],
    )
}

/// Builds a dated, numbered double-entry journal voucher from line specs.
fn build(lines: &[(bool, i64, Direction)]) -> Voucher {
    let mut voucher = Voucher::new(
        VoucherType::Journal,
        NaiveDate::from_ymd_opt(2025, 9, 30),
        "JV100000",
    );
    while voucher.lines().len() < lines.len() {
        voucher.add_line().unwrap();
    }
    for (i, (has_ledger, minor, direction)) in lines.iter().enumerate() {
        let ledger = if *has_ledger {
            LedgerId::from(format!("L{i}"))
        } else {
            LedgerId::default()
        };
        voucher.apply_field_update(i, LineField::SetLedger(ledger)).unwrap();
        voucher
            .apply_field_update(i, LineField::SetAmount(Amount::from_minor(*minor).to_string()))
            .unwrap();
        voucher
            .apply_field_update(i, LineField::SetDirection(*direction))
            .unwrap();
    }
    voucher
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1: Double-entry acceptance.
    ///
    /// *For any* double-entry voucher, validation SHALL succeed iff total debits equal
    /// total credits and every line has a ledger and a positive amount.
    #[test]
    fn prop_double_entry_accepts_iff_balanced_and_complete(
        lines in prop::collection::vec(line_strategy(), 2..8),
    ) {
        let voucher = build(&lines);
        let totals = voucher.totals();
        let complete = lines.iter().all(|(has_ledger, minor, _)| *has_ledger && *minor > 0);

        let result = BalanceValidator::validate(&voucher);
        prop_assert_eq!(
            result.is_ok(),
            totals.is_balanced && complete,
            "totals {:?}, complete {}, result {:?}",
            totals,
            complete,
            result
        );
    }

    /// Property 2: Constructed balanced vouchers are accepted.
    ///
    /// *For any* set of positive debit amounts offset by a single credit of their sum,
    /// validation SHALL succeed and report equal totals.
    #[test]
    fn prop_balanced_voucher_accepted(
        debits in prop::collection::vec(positive_minor(), 1..6),
    ) {
        let total: i64 = debits.iter().sum();
        let mut lines: Vec<_> = debits.iter().map(|m| (true, *m, Direction::Debit)).collect();
        lines.push((true, total, Direction::Credit));

        let totals = BalanceValidator::validate(&build(&lines)).unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.total_debit, Amount::from_minor(total));
    }

    /// Property 3: Off-by-one-cent is rejected with only a balance error.
    #[test]
    fn prop_one_cent_difference_rejected(amount in positive_minor()) {
        let voucher = build(&[
            (true, amount, Direction::Debit),
            (true, amount + 1, Direction::Credit),
        ]);
        let errors = BalanceValidator::validate(&voucher).unwrap_err();
        prop_assert_eq!(errors.keys().collect::<Vec<_>>(), vec![FieldKey::Balance]);
    }

    /// Property 4: Validation is idempotent.
    ///
    /// *For any* voucher, validating twice without changes SHALL yield identical results.
    #[test]
    fn prop_validation_idempotent(
        lines in prop::collection::vec(line_strategy(), 2..8),
    ) {
        let voucher = build(&lines);
        prop_assert_eq!(
            BalanceValidator::validate(&voucher),
            BalanceValidator::validate(&voucher)
        );
    }

    /// Property 5: Per-line errors are keyed by line index.
    #[test]
    fn prop_missing_ledger_keyed_by_index(
        lines in prop::collection::vec(line_strategy(), 2..8),
    ) {
        let errors = BalanceValidator::collect_errors(&build(&lines));
        for (i, (has_ledger, minor, _)) in lines.iter().enumerate() {
            prop_assert_eq!(errors.contains(FieldKey::Ledger(i)), !*has_ledger);
            prop_assert_eq!(errors.contains(FieldKey::Amount(i)), *minor == 0);
        }
    }
}
