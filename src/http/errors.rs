//! Error responses
//!
//! Failures are returned as a JSON body `{"error": code, "message": text}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::types::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> Response {
    match err {
        LedgerError::InvalidInput { message } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_input", message)
        }
        LedgerError::NotFound { id } => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("account {id} not found"),
        ),
        err @ LedgerError::InsufficientFunds { .. } => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "insufficient_funds",
            err.to_string(),
        ),
        err @ (LedgerError::StorageFailure { .. } | LedgerError::Bootstrap { .. }) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "storage_failure",
            err.to_string(),
        ),
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
