//! Database seeder for Voucherbook development and testing.
//!
//! Seeds a small ledger master and, when the voucher table is empty, a few sample
//! vouchers so the entry screens have something to show.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use voucherbook_core::fiscal::FiscalCalendar;
use voucherbook_core::ledger::{LedgerKind, LedgerReference};
use voucherbook_core::voucher::{
    Direction, EntryMode, LineField, Voucher, VoucherFilter, VoucherRepository, VoucherService,
    VoucherType,
};
use voucherbook_db::{PgLedgerDirectory, PgVoucherRepository};
use voucherbook_shared::config::VoucherSettings;
use voucherbook_shared::types::{LedgerId, PageRequest};

/// (id, name, kind, group)
const LEDGERS: &[(&str, &str, LedgerKind, &str)] = &[
    ("cash", "Cash", LedgerKind::Cash, "Cash-in-Hand"),
    ("petty-cash", "Petty Cash", LedgerKind::Cash, "Cash-in-Hand"),
    ("hdfc-current", "HDFC Bank Current A/c", LedgerKind::Bank, "Bank Accounts"),
    ("sbi-savings", "SBI Savings A/c", LedgerKind::Bank, "Bank Accounts"),
    ("acme-traders", "Acme Traders", LedgerKind::Party, "Sundry Debtors"),
    ("globex-supplies", "Globex Supplies", LedgerKind::Party, "Sundry Creditors"),
    ("sales", "Sales", LedgerKind::Income, "Sales Accounts"),
    ("interest-received", "Interest Received", LedgerKind::Income, "Indirect Incomes"),
    ("rent", "Rent", LedgerKind::Expense, "Indirect Expenses"),
    ("office-supplies", "Office Supplies", LedgerKind::Expense, "Indirect Expenses"),
    ("salaries", "Salaries", LedgerKind::Expense, "Indirect Expenses"),
    ("capital", "Capital Account", LedgerKind::Other, "Capital Account"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = voucherbook_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding ledgers...");
    let directory = PgLedgerDirectory::new(db.clone());
    for (id, name, kind, group) in LEDGERS {
        let mut ledger = LedgerReference::new(*id, *name, *kind);
        ledger.group_name = Some((*group).to_string());
        directory
            .upsert(&ledger)
            .await
            .with_context(|| format!("Failed to upsert ledger {id}"))?;
    }
    println!("  Upserted {} ledgers", LEDGERS.len());

    println!("Seeding vouchers...");
    let repository = Arc::new(PgVoucherRepository::new(db, FiscalCalendar::default()));
    let existing = repository
        .list(&VoucherFilter::default(), PageRequest::new(1, 1))
        .await?;
    if existing.meta.total > 0 {
        println!("  Vouchers already exist, skipping...");
    } else {
        let service = VoucherService::new(repository, &VoucherSettings::default());
        for voucher in sample_vouchers()? {
            let stored = service
                .create(voucher)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create sample voucher: {e}"))?;
            println!("  Created {} {}", stored.voucher_type, stored.number);
        }
    }

    println!("Seeding complete!");
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).context("invalid sample date")
}

fn sample_vouchers() -> anyhow::Result<Vec<Voucher>> {
    // Rent paid in cash, entered as a single-entry payment.
    let mut rent = Voucher::new(VoucherType::Payment, Some(date(2025, 4, 5)?), "");
    rent.set_mode(EntryMode::SingleEntry);
    rent.narration = Some("Office rent for April".into());
    set_line(&mut rent, 0, "rent", "18000")?;
    set_line(&mut rent, 1, "cash", "18000")?;

    // Cash deposited into the bank.
    let mut deposit = Voucher::new(VoucherType::Contra, Some(date(2025, 4, 7)?), "");
    set_line(&mut deposit, 0, "hdfc-current", "50000")?;
    set_line(&mut deposit, 1, "cash", "50000")?;

    // Opening capital split across cash and bank.
    let mut opening = Voucher::new(VoucherType::Journal, Some(date(2025, 4, 1)?), "");
    opening.add_line()?;
    set_line(&mut opening, 0, "cash", "25000")?;
    set_line(&mut opening, 1, "capital", "100000")?;
    set_line(&mut opening, 2, "sbi-savings", "75000")?;
    opening.apply_field_update(2, LineField::SetDirection(Direction::Debit))?;

    Ok(vec![opening, rent, deposit])
}

fn set_line(voucher: &mut Voucher, index: usize, ledger: &str, amount: &str) -> anyhow::Result<()> {
    voucher.apply_field_update(index, LineField::SetLedger(LedgerId::from(ledger)))?;
    voucher.apply_field_update(index, LineField::SetAmount(amount.to_string()))?;
    Ok(())
}
