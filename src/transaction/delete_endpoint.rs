//! The route handler for soft-deleting a transaction.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{AppState, Error, envelope::ApiResponse, validation::parse_transaction_id};

use super::soft_delete_transaction;

/// A route handler for soft-deleting an active transaction.
///
/// The record is kept and stamped with the deletion time; it can be brought
/// back through the restore endpoint. Deleting a transaction that is absent
/// or already deleted reports not found.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Response, Error> {
    let id = parse_transaction_id(&transaction_id)?;

    let connection = state.db_connection.lock().unwrap();
    let transaction = soft_delete_transaction(id, &connection)?;

    Ok(Json(ApiResponse::message(
        "Transaction deleted successfully",
        transaction,
    ))
    .into_response())
}
