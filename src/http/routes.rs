//! Route table and handlers
//!
//! Handlers resolve the account id first, then decode and validate the body,
//! and only then call into the ledger.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::{dto, errors};
use crate::core::{router as account_router, Ledger};
use crate::types::TransactionRequest;

/// Build the application router over a shared ledger
///
/// Both the legacy Portuguese paths and the English ones are served.
pub fn router(ledger: Arc<Ledger>) -> Router {
    Router::new()
        .route("/clientes/:id/extrato", get(get_statement))
        .route("/clientes/:id/transacoes", post(record_transaction))
        .route("/accounts/:id/statement", get(get_statement))
        .route("/accounts/:id/transactions", post(record_transaction))
        .with_state(ledger)
}

pub async fn get_statement(
    State(ledger): State<Arc<Ledger>>,
    Path(id): Path<String>,
) -> Response {
    match ledger.statement(&id).await {
        Ok(statement) => (StatusCode::OK, Json(dto::StatementResponse::from(statement))).into_response(),
        Err(err) => errors::ledger_error_to_response(err),
    }
}

pub async fn record_transaction(
    State(ledger): State<Arc<Ledger>>,
    Path(id): Path<String>,
    body: Result<Json<dto::TransactionBody>, JsonRejection>,
) -> Response {
    // An unknown account is reported even when the body is malformed
    let account = match account_router::resolve(&id) {
        Ok(account) => account,
        Err(err) => return errors::ledger_error_to_response(err),
    };

    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return errors::json_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_body",
                rejection.body_text(),
            )
        }
    };

    let request = match TransactionRequest::new(body.value, &body.kind, body.description) {
        Ok(request) => request,
        Err(err) => return errors::ledger_error_to_response(err),
    };

    match ledger.apply_request(account, &request).await {
        Ok(balance) => (StatusCode::OK, Json(balance)).into_response(),
        Err(err) => errors::ledger_error_to_response(err),
    }
}
