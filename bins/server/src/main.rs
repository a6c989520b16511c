//! Voucherbook API Server
//!
//! Main entry point for the voucher entry service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voucherbook_api::{AppState, create_router};
use voucherbook_core::fiscal::FiscalCalendar;
use voucherbook_core::ledger::LedgerDirectory;
use voucherbook_core::voucher::{VoucherRepository, VoucherService};
use voucherbook_db::{InMemoryVoucherStore, PgLedgerDirectory, PgVoucherRepository, connect_with};
use voucherbook_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voucherbook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let calendar = FiscalCalendar::starting(config.vouchers.fiscal_year_start_month)
        .context("vouchers.fiscal_year_start_month must be between 1 and 12")?;

    let (repository, ledgers): (Arc<dyn VoucherRepository>, Arc<dyn LedgerDirectory>) =
        if config.database.url.is_some() {
            let db = connect_with(&config.database).await?;
            info!("Connected to database");
            (
                Arc::new(PgVoucherRepository::new(db.clone(), calendar)),
                Arc::new(PgLedgerDirectory::new(db)),
            )
        } else {
            warn!("No database url configured, vouchers are kept in memory");
            let store = Arc::new(InMemoryVoucherStore::new(calendar));
            let repository: Arc<dyn VoucherRepository> = store.clone();
            let ledgers: Arc<dyn LedgerDirectory> = store;
            (repository, ledgers)
        };

    let vouchers = VoucherService::new(repository, &config.vouchers)
        .with_ledger_directory(Arc::clone(&ledgers));
    info!(
        numbering = ?config.vouchers.numbering,
        fiscal_year_start_month = calendar.start_month(),
        "Voucher service configured"
    );

    let state = AppState {
        vouchers: Arc::new(vouchers),
        ledgers,
    };
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
