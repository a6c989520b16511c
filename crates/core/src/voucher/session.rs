//! Interactive edit sessions.
//!
//! A session owns one voucher being entered and the errors shown against its fields. At
//! most one submission is outstanding at a time: edits are refused while it is in flight,
//! and a response is applied only if it answers the outstanding ticket. Abandoning a
//! submission bumps the generation so a late response is discarded.

use voucherbook_shared::types::VoucherId;

use super::aggregate::Voucher;
use super::error::{EditError, SubmitError, VoucherError};
use super::field::{HeaderField, LineField};
use super::service::VoucherService;
use super::types::EntryMode;
use super::validation::{BalanceValidator, FieldKey, ValidationErrors};

/// Proof of an outstanding submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
}

impl SubmitTicket {
    /// Generation of the voucher state that was submitted.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// What happened to a submission response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResolution {
    /// The response answered the outstanding submission and was applied.
    Applied,
    /// The response was for an abandoned or superseded submission and was ignored.
    Stale,
}

/// One voucher being entered by one user.
#[derive(Debug, Clone)]
pub struct EditSession {
    voucher: Voucher,
    errors: ValidationErrors,
    generation: u64,
    in_flight: Option<u64>,
}

impl EditSession {
    /// Starts a session over `voucher`.
    #[must_use]
    pub fn new(voucher: Voucher) -> Self {
        Self {
            voucher,
            errors: ValidationErrors::new(),
            generation: 0,
            in_flight: None,
        }
    }

    /// The voucher as currently entered.
    #[must_use]
    pub const fn voucher(&self) -> &Voucher {
        &self.voucher
    }

    /// Errors currently shown.
    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Counter bumped by every accepted edit and every abandoned submission.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true while a submission awaits its response.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Edits a line field and clears the errors shown for it.
    ///
    /// # Errors
    ///
    /// Returns `EditError::SubmissionInFlight` during a submission, or the error the
    /// voucher refused the edit with.
    pub fn edit_line(&mut self, index: usize, field: LineField) -> Result<(), EditError> {
        self.ensure_editable()?;
        let cleared = self.keys_for_line_field(index, &field);
        self.voucher.apply_field_update(index, field)?;
        for key in cleared {
            self.errors.remove(key);
        }
        self.touch();
        Ok(())
    }

    /// Edits a header field and clears the error shown for it.
    ///
    /// # Errors
    ///
    /// Returns `EditError::SubmissionInFlight` during a submission, or the error the
    /// voucher refused the edit with.
    pub fn edit_header(&mut self, field: HeaderField) -> Result<(), EditError> {
        self.ensure_editable()?;
        let cleared = match field {
            HeaderField::SetDate(_) => Some(FieldKey::Date),
            HeaderField::SetNumber(_) => Some(FieldKey::Number),
            _ => None,
        };
        self.voucher.apply_header_update(field)?;
        if let Some(key) = cleared {
            self.errors.remove(key);
        }
        self.touch();
        Ok(())
    }

    /// Appends a blank credit line.
    ///
    /// # Errors
    ///
    /// Returns an `EditError` during a submission or in single-entry mode.
    pub fn add_line(&mut self) -> Result<(), EditError> {
        self.ensure_editable()?;
        self.voucher.add_line()?;
        self.errors.remove(FieldKey::Entries);
        self.touch();
        Ok(())
    }

    /// Removes a line. Line errors are cleared since their indices shift.
    ///
    /// # Errors
    ///
    /// Returns an `EditError` during a submission or if the voucher refuses the removal.
    pub fn remove_line(&mut self, index: usize) -> Result<(), EditError> {
        self.ensure_editable()?;
        self.voucher.remove_line(index)?;
        self.errors.clear();
        self.touch();
        Ok(())
    }

    /// Switches entry mode, clearing every error.
    ///
    /// # Errors
    ///
    /// Returns `EditError::SubmissionInFlight` during a submission.
    pub fn set_mode(&mut self, mode: EntryMode) -> Result<(), EditError> {
        self.ensure_editable()?;
        self.voucher.set_mode(mode);
        self.errors.clear();
        self.touch();
        Ok(())
    }

    /// Re-runs validation, replacing the shown errors. Returns true if the voucher is valid.
    pub fn validate(&mut self) -> bool {
        self.errors = BalanceValidator::collect_errors(&self.voucher);
        self.errors.is_empty()
    }

    /// Validates and marks a submission as outstanding.
    ///
    /// Returns the ticket to resolve it with and the voucher to send.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::InFlight` if a submission is already outstanding, or
    /// `SubmitError::Invalid` if validation fails.
    pub fn begin_submit(&mut self) -> Result<(SubmitTicket, Voucher), SubmitError> {
        if self.in_flight.is_some() {
            return Err(SubmitError::InFlight);
        }
        if !self.validate() {
            return Err(SubmitError::Invalid(self.errors.clone()));
        }
        self.in_flight = Some(self.generation);
        Ok((
            SubmitTicket {
                generation: self.generation,
            },
            self.voucher.clone(),
        ))
    }

    /// Applies the response to a submission.
    ///
    /// A stored voucher replaces the local one (taking the authoritative id). Validation
    /// errors from the far side replace the shown errors; a persistence failure is shown
    /// under the `submit` key. Responses to anything but the outstanding ticket are ignored.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        outcome: Result<Voucher, SubmitError>,
    ) -> SubmitResolution {
        if self.in_flight != Some(ticket.generation) {
            return SubmitResolution::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(stored) => {
                self.voucher = stored;
                self.errors.clear();
                self.touch();
            }
            Err(SubmitError::Invalid(errors)) => self.errors = errors,
            Err(SubmitError::Persistence(err)) => {
                self.errors
                    .insert(FieldKey::Submission, VoucherError::PersistenceFailure(err));
            }
            Err(SubmitError::InFlight) => {}
        }
        SubmitResolution::Applied
    }

    /// Gives up on the outstanding submission; its response will be ignored.
    pub fn abandon_submit(&mut self) {
        if self.in_flight.take().is_some() {
            self.touch();
        }
    }

    /// Submits through `service`, creating the voucher or updating `existing`.
    ///
    /// # Errors
    ///
    /// Returns the `SubmitError` that was also recorded against the session.
    pub async fn submit(
        &mut self,
        service: &VoucherService,
        existing: Option<VoucherId>,
    ) -> Result<VoucherId, SubmitError> {
        let (ticket, voucher) = self.begin_submit()?;
        let outcome = match existing {
            Some(id) => service.update(id, voucher).await,
            None => service.create(voucher).await,
        };
        let result = outcome.as_ref().map(|stored| stored.id).map_err(Clone::clone);
        self.finish_submit(ticket, outcome);
        result
    }

    fn ensure_editable(&self) -> Result<(), EditError> {
        if self.in_flight.is_some() {
            Err(EditError::SubmissionInFlight)
        } else {
            Ok(())
        }
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    fn keys_for_line_field(&self, index: usize, field: &LineField) -> Vec<FieldKey> {
        match field {
            LineField::SetLedger(_) => vec![FieldKey::Ledger(index), FieldKey::LedgerKind(index)],
            LineField::SetAmount(_) if self.voucher.is_single_entry() => {
                vec![FieldKey::Amount(0), FieldKey::Amount(1), FieldKey::Balance]
            }
            LineField::SetAmount(_) | LineField::SetDirection(_) => {
                vec![FieldKey::Amount(index), FieldKey::Balance]
            }
            LineField::SetItem(_) => vec![FieldKey::Quantity(index)],
            _ => Vec::new(),
        }
    }
}
