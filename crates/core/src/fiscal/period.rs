//! Fiscal year types.

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar describing when fiscal years begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalCalendar {
    start_month: Month,
}

impl FiscalCalendar {
    /// Indian fiscal calendar (April to March).
    pub const APRIL: Self = Self {
        start_month: Month::April,
    };

    /// Creates a calendar whose years start on the given month (1-12).
    ///
    /// Returns `None` for a month outside 1-12.
    #[must_use]
    pub fn starting(month: u32) -> Option<Self> {
        let month = u8::try_from(month).ok()?;
        Month::try_from(month)
            .ok()
            .map(|start_month| Self { start_month })
    }

    /// Returns the first month of each fiscal year (1-12).
    #[must_use]
    pub fn start_month(&self) -> u32 {
        self.start_month.number_from_month()
    }

    /// Returns the fiscal year containing `date`.
    ///
    /// Returns `None` only at the edges of the representable date range.
    #[must_use]
    pub fn year_of(&self, date: NaiveDate) -> Option<FiscalYear> {
        let start_month = self.start_month();
        let start_year = if date.month() >= start_month {
            date.year()
        } else {
            date.year() - 1
        };

        let start = NaiveDate::from_ymd_opt(start_year, start_month, 1)?;
        let next_start = NaiveDate::from_ymd_opt(start_year + 1, start_month, 1)?;
        let end = next_start.pred_opt()?;

        Some(FiscalYear {
            start_date: start,
            end_date: end,
        })
    }
}

impl Default for FiscalCalendar {
    fn default() -> Self {
        Self::APRIL
    }
}

/// Fiscal year definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalYear {
    /// Start date of the fiscal year.
    pub start_date: NaiveDate,
    /// End date of the fiscal year.
    pub end_date: NaiveDate,
}

impl FiscalYear {
    /// Calendar year in which this fiscal year starts; used as the storage key.
    #[must_use]
    pub fn start_year(&self) -> i32 {
        self.start_date.year()
    }

    /// Year name (e.g., "2025-26", or "2026" for calendar-aligned years).
    #[must_use]
    pub fn label(&self) -> String {
        if self.start_date.year() == self.end_date.year() {
            self.start_date.year().to_string()
        } else {
            format!(
                "{}-{:02}",
                self.start_date.year(),
                self.end_date.year().rem_euclid(100)
            )
        }
    }

    /// Returns true if the given date falls within this fiscal year.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}
