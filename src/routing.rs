//! Application router configuration.

use axum::{
    Json, Router,
    http::{Method, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde_json::json;

use crate::{
    AppState, endpoints,
    logging::logging_middleware,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, restore_transaction_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::RESTORE_TRANSACTION,
            patch(restore_transaction_endpoint),
        )
        .fallback(route_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root route describes the service and where to find it.
async fn get_index() -> Response {
    Json(json!({
        "message": "Welcome to the Transaction API",
        "status": "Server is running",
        "endpoints": {
            "transactions": endpoints::TRANSACTIONS,
        },
    }))
    .into_response()
}

/// Unknown routes get a JSON 404 naming the method and path.
async fn route_not_found(method: Method, uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": format!("Route {method} {uri} not found"),
        })),
    )
        .into_response()
}
