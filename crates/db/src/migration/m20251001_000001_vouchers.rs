//! Initial database migration.
//!
//! Creates the ledger master, vouchers and voucher lines. Voucher numbers are unique per
//! voucher type within a fiscal year.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(LEDGERS_SQL).await?;
        db.execute_unprepared(VOUCHERS_SQL).await?;
        db.execute_unprepared(VOUCHER_LINES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS voucher_lines CASCADE;
             DROP TABLE IF EXISTS vouchers CASCADE;
             DROP TABLE IF EXISTS ledgers CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const LEDGERS_SQL: &str = r"
-- Ledger master (read-only from the voucher side)
CREATE TABLE ledgers (
    id VARCHAR(64) PRIMARY KEY,
    name VARCHAR(200) NOT NULL,
    kind VARCHAR(16) NOT NULL,
    group_name VARCHAR(200),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_ledger_kind CHECK (kind IN ('cash', 'bank', 'party', 'income', 'expense', 'other'))
);

-- Ledger pickers filter by kind and sort by name
CREATE INDEX idx_ledgers_kind_name ON ledgers(kind, name);
";

const VOUCHERS_SQL: &str = r"
CREATE TABLE vouchers (
    id UUID PRIMARY KEY,
    voucher_type VARCHAR(32) NOT NULL,
    number VARCHAR(64) NOT NULL,
    fiscal_year INTEGER NOT NULL,
    voucher_date DATE NOT NULL,
    mode VARCHAR(16) NOT NULL,
    reference_no VARCHAR(100),
    reference_date DATE,
    narration TEXT,
    field_config JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_voucher_mode CHECK (mode IN ('single-entry', 'double-entry')),
    CONSTRAINT chk_voucher_number_not_blank CHECK (length(trim(number)) > 0)
);

-- Number assignment is serialized by this constraint
CREATE UNIQUE INDEX uq_vouchers_type_year_number ON vouchers(voucher_type, fiscal_year, number);

-- Listing: newest first, optionally by type
CREATE INDEX idx_vouchers_date ON vouchers(voucher_date DESC, created_at DESC);
CREATE INDEX idx_vouchers_type_date ON vouchers(voucher_type, voucher_date DESC);
";

const VOUCHER_LINES_SQL: &str = r"
CREATE TABLE voucher_lines (
    voucher_id UUID NOT NULL REFERENCES vouchers(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    line_key VARCHAR(32) NOT NULL,
    ledger_id VARCHAR(64) NOT NULL REFERENCES ledgers(id),
    amount NUMERIC(19, 2) NOT NULL,
    direction VARCHAR(6) NOT NULL,
    narration TEXT,
    cost_centre_id VARCHAR(64),
    bank_name VARCHAR(100),
    cheque_number VARCHAR(32),
    stock_item_id VARCHAR(64),
    godown_id VARCHAR(64),
    quantity NUMERIC(19, 4),
    rate NUMERIC(19, 2),
    PRIMARY KEY (voucher_id, position),
    CONSTRAINT chk_line_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_line_direction CHECK (direction IN ('debit', 'credit')),
    CONSTRAINT chk_line_quantity_positive CHECK (quantity IS NULL OR quantity > 0)
);

CREATE INDEX idx_voucher_lines_ledger ON voucher_lines(ledger_id);
";
