//! Voucher service: numbering, validation and submission to the repository.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};
use voucherbook_shared::config::{NumberingScheme, VoucherFieldConfig, VoucherSettings};
use voucherbook_shared::types::{PageRequest, PageResponse, VoucherId};

use super::aggregate::Voucher;
use super::error::{PersistenceError, SubmitError};
use super::numbering::{generate_voucher_number, next_sequential_number};
use super::repository::{VoucherFilter, VoucherRepository, VoucherSummary};
use super::types::{VoucherTotals, VoucherType};
use super::validation::BalanceValidator;
use crate::fiscal::FiscalCalendar;
use crate::ledger::LedgerDirectory;

/// Coordinates voucher entry with the repository and the ledger master.
///
/// The service holds no voucher state of its own; every method works on the voucher it
/// is given.
pub struct VoucherService {
    repository: Arc<dyn VoucherRepository>,
    ledgers: Option<Arc<dyn LedgerDirectory>>,
    numbering: NumberingScheme,
    calendar: FiscalCalendar,
    fields: VoucherFieldConfig,
    retry_attempts: u32,
}

impl VoucherService {
    /// Creates a service over `repository` using the given settings.
    #[must_use]
    pub fn new(repository: Arc<dyn VoucherRepository>, settings: &VoucherSettings) -> Self {
        Self {
            repository,
            ledgers: None,
            numbering: settings.numbering,
            calendar: FiscalCalendar::starting(settings.fiscal_year_start_month)
                .unwrap_or_default(),
            fields: settings.fields,
            retry_attempts: settings.number_retry_attempts,
        }
    }

    /// Also checks ledgers against the ledger master when validating.
    #[must_use]
    pub fn with_ledger_directory(mut self, ledgers: Arc<dyn LedgerDirectory>) -> Self {
        self.ledgers = Some(ledgers);
        self
    }

    /// Default field configuration for new vouchers.
    #[must_use]
    pub const fn field_config(&self) -> VoucherFieldConfig {
        self.fields
    }

    /// Fiscal calendar used for sequential numbering.
    #[must_use]
    pub const fn calendar(&self) -> FiscalCalendar {
        self.calendar
    }

    /// Starts a new voucher with the default field configuration and, under auto
    /// numbering, a suggested number.
    ///
    /// # Errors
    ///
    /// Returns a `PersistenceError` if sequential numbering cannot read existing numbers.
    pub async fn draft(
        &self,
        voucher_type: VoucherType,
        date: Option<NaiveDate>,
    ) -> Result<Voucher, PersistenceError> {
        let mut voucher = Voucher::new(voucher_type, date, String::new()).with_config(self.fields);
        if self.fields.auto_numbering {
            voucher.assign_number(self.suggest_number(voucher_type, date).await?);
        }
        Ok(voucher)
    }

    /// Suggests a number for a voucher of `voucher_type` dated `date` (today if unset).
    ///
    /// # Errors
    ///
    /// Returns a `PersistenceError` if sequential numbering cannot read existing numbers.
    pub async fn suggest_number(
        &self,
        voucher_type: VoucherType,
        date: Option<NaiveDate>,
    ) -> Result<String, PersistenceError> {
        let prefix = voucher_type.number_prefix();
        match self.numbering {
            NumberingScheme::Random => Ok(generate_voucher_number(prefix)),
            NumberingScheme::Sequential => {
                let on = date.unwrap_or_else(|| Local::now().date_naive());
                let year = self.calendar.year_of(on).ok_or_else(|| {
                    PersistenceError::Rejected(format!("no fiscal year contains {on}"))
                })?;
                let existing = self
                    .repository
                    .numbers_in_fiscal_year(voucher_type, &year)
                    .await?;
                Ok(next_sequential_number(prefix, existing))
            }
        }
    }

    /// Validates a voucher, including ledger checks when a ledger directory is attached.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Invalid` with every problem found, or
    /// `SubmitError::Persistence` if the ledger master cannot be read.
    pub async fn validate(&self, voucher: &Voucher) -> Result<VoucherTotals, SubmitError> {
        let result = match &self.ledgers {
            Some(ledgers) => {
                let table = ledgers.ledger_table().await?;
                BalanceValidator::validate_with_ledgers(voucher, &table)
            }
            None => BalanceValidator::validate(voucher),
        };
        Ok(result?)
    }

    /// Drops hidden field values and, under auto numbering, fills in a blank number.
    ///
    /// With a ledger directory attached, bank details are also dropped from lines that
    /// do not post to a bank ledger.
    ///
    /// # Errors
    ///
    /// Returns a `PersistenceError` if the ledger master or, under sequential numbering,
    /// the existing numbers cannot be read.
    pub async fn prepare(&self, voucher: &mut Voucher) -> Result<(), PersistenceError> {
        voucher.strip_hidden();
        if let Some(ledgers) = &self.ledgers {
            voucher.strip_bank_details(&ledgers.ledger_table().await?);
        }
        if voucher.config.auto_numbering && voucher.number.trim().is_empty() {
            let number = self
                .suggest_number(voucher.voucher_type, voucher.date)
                .await?;
            voucher.assign_number(number);
        }
        Ok(())
    }

    /// Validates and stores a new voucher, returning it with its authoritative id.
    ///
    /// Hidden field values are dropped first. A blank number is filled in under auto
    /// numbering. When the repository reports a duplicate number for an auto-numbered
    /// voucher, a fresh number is tried up to the configured number of times; manual
    /// numbers are never replaced.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Invalid` if validation fails (nothing is sent), or
    /// `SubmitError::Persistence` if the repository refuses the write.
    pub async fn create(&self, mut voucher: Voucher) -> Result<Voucher, SubmitError> {
        self.prepare(&mut voucher).await?;
        self.validate(&voucher).await?;

        let mut attempts = 0;
        loop {
            match self.repository.create(&voucher).await {
                Ok(id) => {
                    voucher.id = id;
                    info!(
                        voucher_id = %id,
                        number = %voucher.number,
                        voucher_type = %voucher.voucher_type,
                        "Voucher created"
                    );
                    return Ok(voucher);
                }
                Err(err)
                    if err.is_duplicate_number()
                        && voucher.config.auto_numbering
                        && attempts < self.retry_attempts =>
                {
                    attempts += 1;
                    let number = self
                        .suggest_number(voucher.voucher_type, voucher.date)
                        .await?;
                    warn!(
                        clashing = %voucher.number,
                        retry = %number,
                        attempt = attempts,
                        "Voucher number taken, retrying with a fresh number"
                    );
                    voucher.assign_number(number);
                }
                Err(err) => {
                    warn!(error = %err, number = %voucher.number, "Voucher create rejected");
                    return Err(err.into());
                }
            }
        }
    }

    /// Validates and replaces an existing voucher.
    ///
    /// The number is never regenerated on update.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Invalid` if validation fails, or `SubmitError::Persistence`
    /// if the repository refuses the write.
    pub async fn update(&self, id: VoucherId, mut voucher: Voucher) -> Result<Voucher, SubmitError> {
        voucher.strip_hidden();
        voucher.id = id;
        self.validate(&voucher).await?;
        self.repository.update(id, &voucher).await.inspect_err(|err| {
            warn!(error = %err, voucher_id = %id, "Voucher update rejected");
        })?;
        info!(voucher_id = %id, number = %voucher.number, "Voucher updated");
        Ok(voucher)
    }

    /// Loads a voucher.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no voucher has this id.
    pub async fn find(&self, id: VoucherId) -> Result<Voucher, PersistenceError> {
        self.repository
            .find(id)
            .await?
            .ok_or(PersistenceError::NotFound(id))
    }

    /// Lists vouchers.
    ///
    /// # Errors
    ///
    /// Returns a `PersistenceError` from the repository.
    pub async fn list(
        &self,
        filter: &VoucherFilter,
        page: PageRequest,
    ) -> Result<PageResponse<VoucherSummary>, PersistenceError> {
        self.repository.list(filter, page).await
    }
}
