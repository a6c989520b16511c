//! Ledger lookup used while entering and validating vouchers.

use std::collections::HashMap;

use async_trait::async_trait;
use voucherbook_shared::types::LedgerId;

use super::types::{LedgerKind, LedgerReference};
use crate::voucher::error::PersistenceError;

/// Read-only source of ledger references (the ledger master).
#[async_trait]
pub trait LedgerDirectory: Send + Sync {
    /// Lists ledgers whose kind is in `kinds`; an empty slice lists every ledger.
    async fn list_ledgers(
        &self,
        kinds: &[LedgerKind],
    ) -> Result<Vec<LedgerReference>, PersistenceError>;

    /// Loads a snapshot of every ledger for validation.
    async fn ledger_table(&self) -> Result<LedgerTable, PersistenceError> {
        Ok(self.list_ledgers(&[]).await?.into_iter().collect())
    }

    /// Checks that the backing store answers.
    async fn ping(&self) -> Result<(), PersistenceError> {
        self.list_ledgers(&[]).await.map(|_| ())
    }
}

/// Snapshot of the ledger master keyed by ledger id.
#[derive(Debug, Clone, Default)]
pub struct LedgerTable {
    by_id: HashMap<LedgerId, LedgerReference>,
}

impl LedgerTable {
    /// Looks up a ledger.
    #[must_use]
    pub fn get(&self, id: &LedgerId) -> Option<&LedgerReference> {
        self.by_id.get(id)
    }

    /// Returns the kind of a ledger, if it exists.
    #[must_use]
    pub fn kind_of(&self, id: &LedgerId) -> Option<LedgerKind> {
        self.get(id).map(|ledger| ledger.kind)
    }

    /// Number of ledgers in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if the table holds no ledgers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Ledgers of the given kinds (all ledgers for an empty slice), sorted by name.
    #[must_use]
    pub fn filter_kinds(&self, kinds: &[LedgerKind]) -> Vec<LedgerReference> {
        let mut ledgers: Vec<LedgerReference> = self
            .by_id
            .values()
            .filter(|ledger| kinds.is_empty() || kinds.contains(&ledger.kind))
            .cloned()
            .collect();
        ledgers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        ledgers
    }
}

impl FromIterator<LedgerReference> for LedgerTable {
    fn from_iter<I: IntoIterator<Item = LedgerReference>>(iter: I) -> Self {
        Self {
            by_id: iter
                .into_iter()
                .map(|ledger| (ledger.id.clone(), ledger))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LedgerTable {
        [
            LedgerReference::new("1", "Cash", LedgerKind::Cash),
            LedgerReference::new("2", "State Bank", LedgerKind::Bank),
            LedgerReference::new("3", "Acme Traders", LedgerKind::Party),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_lookup() {
        let table = table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.kind_of(&LedgerId::from("2")), Some(LedgerKind::Bank));
        assert_eq!(table.kind_of(&LedgerId::from("9")), None);
    }

    #[test]
    fn test_filter_kinds_sorted_by_name() {
        let cash_bank = table().filter_kinds(&[LedgerKind::Cash, LedgerKind::Bank]);
        let names: Vec<_> = cash_bank.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Cash", "State Bank"]);
        assert_eq!(table().filter_kinds(&[]).len(), 3);
    }
}
