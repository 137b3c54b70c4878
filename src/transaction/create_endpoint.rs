//! The route handler for creating a transaction.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    envelope::ApiResponse,
    validation::{TransactionPayload, validate_create},
};

use super::create_transaction;

/// A route handler for creating a transaction.
///
/// The payload is validated before the store is touched; a rejected payload
/// writes nothing.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<TransactionPayload>,
) -> Result<Response, Error> {
    let new_transaction = validate_create(payload)?;

    let connection = state.db_connection.lock().unwrap();
    let transaction = create_transaction(new_transaction, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message(
            "Transaction created successfully",
            transaction,
        )),
    )
        .into_response())
}
