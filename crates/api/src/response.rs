//! JSON bodies shared by the voucher routes.
//!
//! Every write answers `{ success, message }`, plus `id` on success or `error` (and
//! `errors` for validation failures) otherwise.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use voucherbook_core::voucher::{PersistenceError, SubmitError, ValidationErrors};
use voucherbook_shared::types::VoucherId;

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Successful write.
pub fn saved(status: StatusCode, id: VoucherId, message: &str) -> Response {
    (
        status,
        Json(json!({
            "success": true,
            "message": message,
            "id": id,
        })),
    )
        .into_response()
}

/// Generic failure with an error code.
pub fn failure(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Validation failure carrying the keyed error set.
pub fn invalid(errors: &ValidationErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "error": "VALIDATION_ERROR",
            "message": format!("Voucher has {} validation error(s)", errors.len()),
            "errors": errors,
        })),
    )
        .into_response()
}

/// Maps a repository error to its status; storage internals are not exposed.
pub fn persistence_failure(err: &PersistenceError) -> Response {
    let message = match err {
        PersistenceError::Storage(_) => {
            error!(error = %err, "Voucher store failed");
            "An error occurred".to_string()
        }
        _ => err.to_string(),
    };
    failure(status(err.http_status_code()), err.error_code(), message)
}

/// Maps a failed submission to a response.
pub fn submit_failure(err: &SubmitError) -> Response {
    match err {
        SubmitError::Invalid(errors) => invalid(errors),
        SubmitError::Persistence(inner) => persistence_failure(inner),
        SubmitError::InFlight => failure(
            status(err.http_status_code()),
            err.error_code(),
            err.to_string(),
        ),
    }
}
