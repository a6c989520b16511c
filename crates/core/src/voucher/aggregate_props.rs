//! Property-based tests for voucher line-set operations and the single-entry mode.

use proptest::prelude::*;

use super::aggregate::Voucher;
use super::error::EditError;
use super::field::LineField;
use super::types::{Direction, EntryMode, VoucherType};

/// Strategy to generate amount input as typed into a form.
fn amount_input() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i64..100_000_000i64).prop_map(|cents| format!("{}.{:02}", cents / 100, cents % 100)),
        (0u32..1_000_000u32).prop_map(|n| n.to_string()),
        "[a-z ]{0,6}",
    ]
}

/// Strategy to generate a voucher type.
fn voucher_type() -> impl Strategy<Value = VoucherType> {
    prop::sample::select(VoucherType::ALL.to_vec())
}

/// An operation on the line set.
#[derive(Debug, Clone)]
enum Op {
    Add,
    Remove(usize),
    Mode(EntryMode),
    Amount(usize, String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Add),
        (0usize..6).prop_map(Op::Remove),
        prop_oneof![Just(EntryMode::SingleEntry), Just(EntryMode::DoubleEntry)].prop_map(Op::Mode),
        (0usize..6, amount_input()).prop_map(|(i, s)| Op::Amount(i, s)),
    ]
}

fn apply(voucher: &mut Voucher, op: &Op) {
    // Refused edits are part of the property; the voucher must stay consistent either way.
    let _ = match op {
        Op::Add => voucher.add_line().map(|_| ()),
        Op::Remove(i) => voucher.remove_line(*i).map(|_| ()),
        Op::Mode(mode) => {
            voucher.set_mode(*mode);
            Ok(())
        }
        Op::Amount(i, input) => voucher.apply_field_update(*i, LineField::SetAmount(input.clone())),
    };
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1: Single-entry amount sync.
    ///
    /// *For any* amount typed on either line of a single-entry voucher, both lines SHALL
    /// hold the same amount immediately after the edit.
    #[test]
    fn prop_single_entry_amounts_stay_equal(
        index in 0usize..2,
        input in amount_input(),
        voucher_type in voucher_type(),
    ) {
        let mut voucher = Voucher::new(voucher_type, None, "");
        voucher.set_mode(EntryMode::SingleEntry);
        voucher.apply_field_update(index, LineField::SetAmount(input)).unwrap();

        prop_assert_eq!(voucher.lines()[0].amount, voucher.lines()[1].amount);
        prop_assert!(voucher.totals().is_balanced);
    }

    /// Property 2: Switching to single-entry always yields a debit/credit pair.
    #[test]
    fn prop_single_entry_shape(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let mut voucher = Voucher::new(VoucherType::Payment, None, "");
        for op in &ops {
            apply(&mut voucher, op);
        }
        voucher.set_mode(EntryMode::SingleEntry);

        prop_assert_eq!(voucher.lines().len(), 2);
        prop_assert_eq!(voucher.lines()[0].direction, Direction::Debit);
        prop_assert_eq!(voucher.lines()[1].direction, Direction::Credit);
    }

    /// Property 3: Removal never drops below two lines.
    ///
    /// *For any* voucher with two lines, `remove_line` SHALL be refused regardless of mode.
    #[test]
    fn prop_remove_is_noop_at_minimum(
        index in 0usize..4,
        single in any::<bool>(),
    ) {
        let mut voucher = Voucher::new(VoucherType::Journal, None, "");
        if single {
            voucher.set_mode(EntryMode::SingleEntry);
        }
        let before = voucher.clone();
        prop_assert!(voucher.remove_line(index).is_err());
        prop_assert_eq!(voucher, before);
    }

    /// Property 4: Any sequence of operations keeps the structural invariants.
    ///
    /// At least two lines always; single-entry vouchers always hold exactly a debit line
    /// then a credit line of equal amount; line ids stay unique.
    #[test]
    fn prop_operations_preserve_structure(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut voucher = Voucher::new(VoucherType::Journal, None, "");
        for op in &ops {
            apply(&mut voucher, op);

            prop_assert!(voucher.lines().len() >= 2);
            if voucher.mode() == EntryMode::SingleEntry {
                prop_assert_eq!(voucher.lines().len(), 2);
                prop_assert_eq!(voucher.lines()[0].direction, Direction::Debit);
                prop_assert_eq!(voucher.lines()[1].direction, Direction::Credit);
                prop_assert_eq!(voucher.lines()[0].amount, voucher.lines()[1].amount);
            }
            let mut ids: Vec<_> = voucher.lines().iter().map(|l| l.id.clone()).collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), voucher.lines().len());
        }
    }

    /// Property 5: add_line never changes a single-entry voucher.
    #[test]
    fn prop_add_line_refused_in_single_entry(input in amount_input()) {
        let mut voucher = Voucher::new(VoucherType::Contra, None, "");
        voucher.set_mode(EntryMode::SingleEntry);
        voucher.apply_field_update(1, LineField::SetAmount(input)).unwrap();
        let before = voucher.clone();

        prop_assert_eq!(voucher.add_line().map(|_| ()), Err(EditError::SingleEntryLocked));
        prop_assert_eq!(voucher, before);
    }
}
