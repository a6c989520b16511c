//! In-memory voucher store.
//!
//! Used by the server when no database URL is configured, and by API tests. Number
//! uniqueness is enforced with an index keyed by (type, fiscal year, number); claiming a
//! key goes through the map's entry API so concurrent writers cannot both win.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use voucherbook_core::fiscal::{FiscalCalendar, FiscalYear};
use voucherbook_core::ledger::{LedgerDirectory, LedgerKind, LedgerReference, LedgerTable};
use voucherbook_core::voucher::{
    PersistenceError, Voucher, VoucherFilter, VoucherRepository, VoucherSummary, VoucherType,
};
use voucherbook_shared::types::{LedgerId, PageRequest, PageResponse, VoucherId};

type NumberKey = (VoucherType, i32, String);

/// Voucher repository and ledger directory held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryVoucherStore {
    vouchers: DashMap<VoucherId, Voucher>,
    numbers: DashMap<NumberKey, VoucherId>,
    ledgers: DashMap<LedgerId, LedgerReference>,
    calendar: FiscalCalendar,
}

impl InMemoryVoucherStore {
    /// Creates an empty store using the given fiscal calendar.
    #[must_use]
    pub fn new(calendar: FiscalCalendar) -> Self {
        Self {
            calendar,
            ..Self::default()
        }
    }

    /// Adds ledgers to the ledger master.
    #[must_use]
    pub fn with_ledgers(self, ledgers: impl IntoIterator<Item = LedgerReference>) -> Self {
        for ledger in ledgers {
            self.ledgers.insert(ledger.id.clone(), ledger);
        }
        self
    }

    /// Number of stored vouchers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vouchers.len()
    }

    /// Returns true if no vouchers are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vouchers.is_empty()
    }

    fn number_key(&self, voucher: &Voucher) -> Result<NumberKey, PersistenceError> {
        let date = voucher
            .date
            .ok_or_else(|| PersistenceError::Rejected("voucher date is required".into()))?;
        let year = self.calendar.year_of(date).ok_or_else(|| {
            PersistenceError::Rejected(format!("no fiscal year contains {date}"))
        })?;
        Ok((
            voucher.voucher_type,
            year.start_year(),
            voucher.number.trim().to_string(),
        ))
    }

    fn check_ledgers(&self, voucher: &Voucher) -> Result<(), PersistenceError> {
        if self.ledgers.is_empty() {
            return Ok(());
        }
        match voucher
            .lines()
            .iter()
            .find(|line| !self.ledgers.contains_key(&line.ledger_id))
        {
            Some(line) => Err(PersistenceError::Rejected(format!(
                "unknown reference: ledger {}",
                line.ledger_id
            ))),
            None => Ok(()),
        }
    }

    fn claim_number(&self, key: NumberKey, id: VoucherId) -> Result<(), PersistenceError> {
        match self.numbers.entry(key) {
            Entry::Occupied(existing) if *existing.get() != id => {
                Err(PersistenceError::DuplicateNumber {
                    number: existing.key().2.clone(),
                    voucher_type: existing.key().0,
                })
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl VoucherRepository for InMemoryVoucherStore {
    async fn create(&self, voucher: &Voucher) -> Result<VoucherId, PersistenceError> {
        self.check_ledgers(voucher)?;
        let key = self.number_key(voucher)?;
        let id = VoucherId::new();
        self.claim_number(key, id)?;

        let mut stored = voucher.clone();
        stored.id = id;
        self.vouchers.insert(id, stored);
        Ok(id)
    }

    async fn update(&self, id: VoucherId, voucher: &Voucher) -> Result<(), PersistenceError> {
        self.check_ledgers(voucher)?;
        let key = self.number_key(voucher)?;

        let Some(mut entry) = self.vouchers.get_mut(&id) else {
            return Err(PersistenceError::NotFound(id));
        };
        let old_key = self.number_key(&entry)?;
        if old_key != key {
            self.claim_number(key, id)?;
            self.numbers.remove(&old_key);
        }

        let mut stored = voucher.clone();
        stored.id = id;
        *entry = stored;
        Ok(())
    }

    async fn find(&self, id: VoucherId) -> Result<Option<Voucher>, PersistenceError> {
        Ok(self.vouchers.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list(
        &self,
        filter: &VoucherFilter,
        page: PageRequest,
    ) -> Result<PageResponse<VoucherSummary>, PersistenceError> {
        let mut matching: Vec<Voucher> = self
            .vouchers
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        // Newest date first; v7 ids break ties by creation order.
        matching.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let data = matching
            .iter()
            .skip(offset)
            .take(page.per_page as usize)
            .map(VoucherSummary::from)
            .collect();

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    async fn numbers_in_fiscal_year(
        &self,
        voucher_type: VoucherType,
        year: &FiscalYear,
    ) -> Result<Vec<String>, PersistenceError> {
        let start_year = year.start_year();
        Ok(self
            .numbers
            .iter()
            .filter(|entry| entry.key().0 == voucher_type && entry.key().1 == start_year)
            .map(|entry| entry.key().2.clone())
            .collect())
    }
}

#[async_trait]
impl LedgerDirectory for InMemoryVoucherStore {
    async fn list_ledgers(
        &self,
        kinds: &[LedgerKind],
    ) -> Result<Vec<LedgerReference>, PersistenceError> {
        let table: LedgerTable = self
            .ledgers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        Ok(table.filter_kinds(kinds))
    }
}
