//! Voucher entry routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use voucherbook_core::voucher::{SubmitError, Voucher, VoucherFilter, VoucherType};
use voucherbook_shared::types::{PageRequest, VoucherId};

use crate::AppState;
use crate::response::{failure, persistence_failure, saved, submit_failure};

/// Creates the voucher routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vouchers", get(list_vouchers).post(create_voucher))
        .route("/vouchers/validate", post(validate_voucher))
        .route("/vouchers/next-number", get(next_number))
        .route("/vouchers/draft", get(draft_voucher))
        .route("/vouchers/{id}", get(get_voucher).put(update_voucher))
}

/// Query parameters for listing vouchers.
#[derive(Debug, Deserialize)]
pub struct ListVouchersQuery {
    /// Filter by voucher type.
    #[serde(rename = "type")]
    pub voucher_type: Option<String>,
    /// Start date filter (inclusive, YYYY-MM-DD format).
    pub from: Option<NaiveDate>,
    /// End date filter (inclusive, YYYY-MM-DD format).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed, default: 1).
    pub page: Option<u32>,
    /// Number of vouchers per page (default: 20, max: 100).
    pub per_page: Option<u32>,
}

/// Query parameters for number suggestions and drafts.
#[derive(Debug, Deserialize)]
pub struct VoucherTypeQuery {
    /// Voucher type, e.g. `payment` or `credit-note`.
    #[serde(rename = "type")]
    pub voucher_type: Option<String>,
    /// Voucher date; defaults to today.
    pub date: Option<NaiveDate>,
}

fn parse_voucher_type(value: Option<&str>) -> Result<Option<VoucherType>, Response> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::parse::<VoucherType>)
        .transpose()
        .map_err(|e| failure(StatusCode::BAD_REQUEST, "INVALID_VOUCHER_TYPE", e.to_string()))
}

fn require_voucher_type(value: Option<&str>) -> Result<VoucherType, Response> {
    parse_voucher_type(value)?.ok_or_else(|| {
        failure(
            StatusCode::BAD_REQUEST,
            "MISSING_VOUCHER_TYPE",
            "Query parameter 'type' is required",
        )
    })
}

/// POST `/vouchers` - Validate and store a new voucher.
async fn create_voucher(
    State(state): State<AppState>,
    Json(voucher): Json<Voucher>,
) -> impl IntoResponse {
    match state.vouchers.create(voucher).await {
        Ok(stored) => saved(StatusCode::CREATED, stored.id, "Voucher saved"),
        Err(err) => submit_failure(&err),
    }
}

/// PUT `/vouchers/{id}` - Validate and replace an existing voucher.
async fn update_voucher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(voucher): Json<Voucher>,
) -> impl IntoResponse {
    let id = VoucherId::from_uuid(id);
    match state.vouchers.update(id, voucher).await {
        Ok(stored) => saved(StatusCode::OK, stored.id, "Voucher updated"),
        Err(err) => submit_failure(&err),
    }
}

/// GET `/vouchers/{id}` - Load a voucher.
async fn get_voucher(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match state.vouchers.find(VoucherId::from_uuid(id)).await {
        Ok(voucher) => (StatusCode::OK, Json(voucher)).into_response(),
        Err(err) => persistence_failure(&err),
    }
}

/// GET `/vouchers` - List vouchers, newest first.
async fn list_vouchers(
    State(state): State<AppState>,
    Query(query): Query<ListVouchersQuery>,
) -> impl IntoResponse {
    let voucher_type = match parse_voucher_type(query.voucher_type.as_deref()) {
        Ok(voucher_type) => voucher_type,
        Err(response) => return response,
    };
    let filter = VoucherFilter {
        voucher_type,
        date_from: query.from,
        date_to: query.to,
    };
    let page = PageRequest::new(query.page.unwrap_or(1), query.per_page.unwrap_or(20));

    match state.vouchers.list(&filter, page).await {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(err) => persistence_failure(&err),
    }
}

/// POST `/vouchers/validate` - Run validation without storing anything.
async fn validate_voucher(
    State(state): State<AppState>,
    Json(mut voucher): Json<Voucher>,
) -> impl IntoResponse {
    if let Err(err) = state.vouchers.prepare(&mut voucher).await {
        return persistence_failure(&err);
    }
    match state.vouchers.validate(&voucher).await {
        Ok(totals) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Voucher is valid",
                "totals": totals,
                "difference": totals.difference(),
            })),
        )
            .into_response(),
        Err(SubmitError::Invalid(errors)) => {
            let totals = voucher.totals();
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "VALIDATION_ERROR",
                    "message": format!("Voucher has {} validation error(s)", errors.len()),
                    "errors": errors,
                    "totals": totals,
                    "difference": totals.difference(),
                })),
            )
                .into_response()
        }
        Err(err) => submit_failure(&err),
    }
}

/// GET `/vouchers/next-number?type=` - Suggest a number under the configured scheme.
async fn next_number(
    State(state): State<AppState>,
    Query(query): Query<VoucherTypeQuery>,
) -> impl IntoResponse {
    let voucher_type = match require_voucher_type(query.voucher_type.as_deref()) {
        Ok(voucher_type) => voucher_type,
        Err(response) => return response,
    };
    match state.vouchers.suggest_number(voucher_type, query.date).await {
        Ok(number) => (
            StatusCode::OK,
            Json(json!({
                "type": voucher_type,
                "number": number,
            })),
        )
            .into_response(),
        Err(err) => persistence_failure(&err),
    }
}

/// GET `/vouchers/draft?type=` - A blank voucher with the default field configuration.
async fn draft_voucher(
    State(state): State<AppState>,
    Query(query): Query<VoucherTypeQuery>,
) -> impl IntoResponse {
    let voucher_type = match require_voucher_type(query.voucher_type.as_deref()) {
        Ok(voucher_type) => voucher_type,
        Err(response) => return response,
    };
    match state.vouchers.draft(voucher_type, query.date).await {
        Ok(voucher) => {
            info!(voucher_type = %voucher_type, number = %voucher.number, "Voucher draft issued");
            (StatusCode::OK, Json(voucher)).into_response()
        }
        Err(err) => persistence_failure(&err),
    }
}
