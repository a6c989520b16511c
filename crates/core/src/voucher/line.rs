//! Voucher lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use voucherbook_shared::config::VoucherFieldConfig;
use voucherbook_shared::types::{Amount, CostCentreId, GodownId, LedgerId, StockItemId};

use super::error::EditError;
use super::types::Direction;

/// Stock movement carried by a line of an inventory voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAllocation {
    /// Stock item moved.
    pub stock_item_id: StockItemId,
    /// Godown the stock moves from or to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub godown_id: Option<GodownId>,
    /// Quantity moved; must be positive at submission.
    pub quantity: Decimal,
    /// Rate per unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Amount>,
}

/// One debit or credit movement against a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherLine {
    /// Identifier unique within the voucher.
    pub id: String,
    /// Ledger debited or credited; blank until selected.
    #[serde(default)]
    pub ledger_id: LedgerId,
    /// Non-negative amount.
    #[serde(default)]
    pub amount: Amount,
    /// Debit or credit.
    #[serde(alias = "type")]
    pub direction: Direction,
    /// Line narration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    /// Cost centre the line is attributed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_centre_id: Option<CostCentreId>,
    /// Bank the cheque is drawn on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    /// Cheque number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque_number: Option<String>,
    /// Stock movement, inventory vouchers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemAllocation>,
}

impl VoucherLine {
    /// Creates a line with no ledger and a zero amount.
    #[must_use]
    pub fn blank(id: impl Into<String>, direction: Direction) -> Self {
        Self {
            id: id.into(),
            ledger_id: LedgerId::default(),
            amount: Amount::ZERO,
            direction,
            narration: None,
            cost_centre_id: None,
            bank_name: None,
            cheque_number: None,
            item: None,
        }
    }

    /// Selects the ledger. A blank key is accepted here and reported at validation.
    pub fn set_ledger(&mut self, ledger_id: LedgerId) {
        self.ledger_id = ledger_id;
    }

    /// Sets the amount from form input.
    ///
    /// Non-numeric input becomes zero. Negative values and values past [`Amount::MAX`]
    /// are refused and the line keeps its previous amount.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NegativeAmount` if the input parses to a negative value, or
    /// `EditError::AmountTooLarge` if it exceeds the amount limit.
    pub fn set_amount(&mut self, index: usize, input: &str) -> Result<Amount, EditError> {
        let amount = Amount::parse_lenient(input);
        if amount.is_negative() {
            return Err(EditError::NegativeAmount { index, amount });
        }
        if !amount.is_within_limit() {
            return Err(EditError::AmountTooLarge { index });
        }
        self.amount = amount;
        Ok(amount)
    }

    /// Amount signed by direction: debits positive, credits negative.
    #[must_use]
    pub fn signed_amount(&self) -> Amount {
        match self.direction {
            Direction::Debit => self.amount,
            Direction::Credit => -self.amount,
        }
    }

    /// Returns true if no ledger or amount has been entered.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.ledger_id.is_blank() && self.amount.is_zero()
    }

    /// Drops values for fields the configuration hides.
    pub fn strip_hidden(&mut self, config: &VoucherFieldConfig) {
        if !config.show_entry_narration {
            self.narration = None;
        }
        if !config.show_cost_centre {
            self.cost_centre_id = None;
        }
        if !config.show_bank_details {
            self.clear_bank_details();
        }
    }

    /// Drops the bank name and cheque number.
    pub fn clear_bank_details(&mut self) {
        self.bank_name = None;
        self.cheque_number = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_blank_line() {
        let line = VoucherLine::blank("1", Direction::Credit);
        assert!(line.is_blank());
        assert_eq!(line.direction, Direction::Credit);
        assert_eq!(line.amount, Amount::ZERO);
    }

    #[rstest]
    #[case("500", dec!(500))]
    #[case(" 12.345 ", dec!(12.34))]
    #[case("abc", dec!(0))]
    #[case("", dec!(0))]
    fn test_set_amount_is_forgiving(#[case] input: &str, #[case] expected: Decimal) {
        let mut line = VoucherLine::blank("1", Direction::Debit);
        let amount = line.set_amount(0, input).unwrap();
        assert_eq!(amount, Amount::new(expected));
        assert_eq!(line.amount, Amount::new(expected));
    }

    #[test]
    fn test_set_amount_rejects_negative() {
        let mut line = VoucherLine::blank("1", Direction::Debit);
        line.set_amount(0, "100").unwrap();
        let err = line.set_amount(0, "-5").unwrap_err();
        assert!(matches!(err, EditError::NegativeAmount { index: 0, .. }));
        assert_eq!(line.amount, Amount::new(dec!(100)));
    }

    #[test]
    fn test_set_amount_rejects_past_limit() {
        let mut line = VoucherLine::blank("1", Direction::Debit);
        line.set_amount(0, "99999999999999999.99").unwrap();
        let err = line.set_amount(0, "100000000000000000").unwrap_err();
        assert_eq!(err, EditError::AmountTooLarge { index: 0 });
        assert_eq!(line.amount, Amount::MAX);
    }

    #[test]
    fn test_signed_amount() {
        let mut line = VoucherLine::blank("1", Direction::Credit);
        line.set_amount(0, "40").unwrap();
        assert_eq!(line.signed_amount(), Amount::new(dec!(-40)));
    }

    #[test]
    fn test_strip_hidden_fields() {
        let mut line = VoucherLine::blank("1", Direction::Debit);
        line.narration = Some("rent".into());
        line.cost_centre_id = Some(CostCentreId::from("CC1"));
        line.bank_name = Some("SBI".into());
        line.cheque_number = Some("000123".into());

        let config = VoucherFieldConfig {
            show_bank_details: false,
            ..VoucherFieldConfig::default()
        };
        line.strip_hidden(&config);

        assert_eq!(line.narration, None);
        assert_eq!(line.cost_centre_id, None);
        assert_eq!(line.bank_name, None);
        assert_eq!(line.cheque_number, None);
    }

    #[test]
    fn test_deserialize_accepts_type_alias() {
        let line: VoucherLine = serde_json::from_str(
            r#"{"id":"1","ledgerId":7,"amount":"250.5","type":"credit"}"#,
        )
        .unwrap();
        assert_eq!(line.direction, Direction::Credit);
        assert_eq!(line.ledger_id.as_str(), "7");
        assert_eq!(line.amount, Amount::new(dec!(250.50)));
    }
}
