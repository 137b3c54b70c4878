//! The route handler for fetching a single transaction.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{AppState, Error, envelope::ApiResponse, validation::parse_transaction_id};

use super::get_transaction;

/// A route handler for fetching an active transaction by its ID.
///
/// Soft-deleted transactions are reported as not found, the same as IDs
/// that never existed.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Response, Error> {
    let id = parse_transaction_id(&transaction_id)?;

    let connection = state.db_connection.lock().unwrap();
    let transaction = get_transaction(id, &connection)?;

    Ok(Json(ApiResponse::data(transaction)).into_response())
}
