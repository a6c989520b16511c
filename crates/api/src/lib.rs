//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for voucher entry and the ledger lookup
//! - JSON response helpers mapping domain errors to status codes

pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use voucherbook_core::ledger::LedgerDirectory;
use voucherbook_core::voucher::VoucherService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Voucher service over the configured repository.
    pub vouchers: Arc<VoucherService>,
    /// Ledger master used for the ledger lookup.
    pub ledgers: Arc<dyn LedgerDirectory>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
