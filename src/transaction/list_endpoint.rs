//! The route handler for listing transactions.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};

use crate::{AppState, Error, envelope::ApiResponse};

use super::{ListParams, TransactionQuery, query_transactions};

/// A route handler for listing active transactions, newest first.
///
/// Supports `page`, `limit`, `type`, `startDate`, and `endDate` query
/// parameters. Soft-deleted transactions never appear in the results.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_transactions_endpoint(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, Error> {
    let query = TransactionQuery::from_params(params, &state.pagination_config);

    let connection = state.db_connection.lock().unwrap();
    let page = query_transactions(&query, &connection)?;

    Ok(Json(ApiResponse::list(
        page.transactions,
        page.total,
        page.page,
        page.total_pages,
    ))
    .into_response())
}
