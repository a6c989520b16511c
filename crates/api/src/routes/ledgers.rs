//! Ledger lookup routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::debug;
use voucherbook_core::ledger::parse_kind_filter;

use crate::AppState;
use crate::response::{failure, persistence_failure};

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ledgers", get(list_ledgers))
}

/// Query parameters for the ledger lookup.
#[derive(Debug, Deserialize)]
pub struct ListLedgersQuery {
    /// Comma-separated ledger kinds, e.g. `cash,bank`. Omit for every ledger.
    pub kind: Option<String>,
}

/// GET `/ledgers?kind=cash,bank` - Ledger references for line selection.
async fn list_ledgers(
    State(state): State<AppState>,
    Query(query): Query<ListLedgersQuery>,
) -> impl IntoResponse {
    let kinds = match parse_kind_filter(query.kind.as_deref().unwrap_or_default()) {
        Ok(kinds) => kinds,
        Err(e) => return failure(StatusCode::BAD_REQUEST, "INVALID_LEDGER_KIND", e.to_string()),
    };

    match state.ledgers.list_ledgers(&kinds).await {
        Ok(ledgers) => {
            debug!(count = ledgers.len(), "Ledger lookup served");
            (StatusCode::OK, Json(ledgers)).into_response()
        }
        Err(err) => persistence_failure(&err),
    }
}
