//! The route handler for restoring a soft-deleted transaction.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{AppState, Error, envelope::ApiResponse, validation::parse_transaction_id};

use super::restore_transaction;

/// A route handler for restoring a soft-deleted transaction.
///
/// This is the only route that can see a soft-deleted record. Restoring a
/// transaction that is absent or still active reports not found.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn restore_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Response, Error> {
    let id = parse_transaction_id(&transaction_id)?;

    let connection = state.db_connection.lock().unwrap();
    let transaction = restore_transaction(id, &connection)?;

    Ok(Json(ApiResponse::message(
        "Transaction restored successfully",
        transaction,
    ))
    .into_response())
}
