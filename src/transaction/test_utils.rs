//! Shared helpers for transaction endpoint tests.

use axum::http::StatusCode;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{AppState, endpoints, pagination::PaginationConfig, routing::build_router};

/// Create a test server backed by a fresh in-memory database.
pub fn test_server() -> TestServer {
    let connection = Connection::open_in_memory().expect("Could not open database in memory");
    let state = AppState::new(connection, PaginationConfig::default())
        .expect("Could not initialize database");

    TestServer::new(build_router(state))
}

/// Create a transaction through the API and return its JSON record.
pub async fn post_transaction(
    server: &TestServer,
    kind: &str,
    amount: f64,
    description: &str,
) -> Value {
    let response = server
        .post(endpoints::TRANSACTIONS)
        .json(&json!({
            "type": kind,
            "amount": amount,
            "description": description,
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    response.json::<Value>()["data"].clone()
}
