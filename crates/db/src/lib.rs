//! Database layer with `SeaORM` entities and voucher repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for ledgers, vouchers and voucher lines
//! - `PostgreSQL` implementations of the voucher repository and ledger directory
//! - An in-memory store for development without a database
//! - Database migrations

pub mod entities;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use memory::InMemoryVoucherStore;
pub use repositories::{PgLedgerDirectory, PgVoucherRepository};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use voucherbook_shared::config::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Connects using the pool settings from configuration.
///
/// # Errors
///
/// Returns an error if no URL is configured or the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| DbErr::Custom("database url is not configured".into()))?;
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
