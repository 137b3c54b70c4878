//! The route handler for updating a transaction.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    envelope::ApiResponse,
    validation::{TransactionPayload, parse_transaction_id, validate_update},
};

use super::update_transaction;

/// A route handler for updating an active transaction.
///
/// Accepts any subset of the creation fields. The update cannot touch the
/// record's ID, creation time, or lifecycle state, and a soft-deleted
/// transaction is reported as not found.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn update_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    Json(payload): Json<TransactionPayload>,
) -> Result<Response, Error> {
    let id = parse_transaction_id(&transaction_id)?;
    let patch = validate_update(payload)?;

    let connection = state.db_connection.lock().unwrap();
    let transaction = update_transaction(id, patch, &connection)?;

    Ok(Json(ApiResponse::message(
        "Transaction updated successfully",
        transaction,
    ))
    .into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        transaction::test_utils::{post_transaction, test_server},
    };

    #[tokio::test]
    async fn update_applies_partial_patch() {
        let server = test_server();
        let created = post_transaction(&server, "expense", 45.0, "coffee").await;
        let id = created["id"].as_i64().unwrap();

        let response = server
            .put(&endpoints::format_endpoint(endpoints::TRANSACTION, id))
            .json(&json!({"amount": 50, "description": "oat milk coffee"}))
            .await;

        response.assert_status(StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["message"], json!("Transaction updated successfully"));
        assert_eq!(body["data"]["amount"], json!(50.0));
        assert_eq!(body["data"]["description"], json!("oat milk coffee"));
        assert_eq!(body["data"]["type"], json!("expense"));
    }

    #[tokio::test]
    async fn update_preserves_id_created_at_and_lifecycle() {
        let server = test_server();
        let created = post_transaction(&server, "expense", 45.0, "coffee").await;
        let id = created["id"].as_i64().unwrap();

        let response = server
            .put(&endpoints::format_endpoint(endpoints::TRANSACTION, id))
            .json(&json!({"type": "income"}))
            .await;

        let body = response.json::<Value>();
        assert_eq!(body["data"]["id"], created["id"]);
        assert_eq!(body["data"]["createdAt"], created["createdAt"]);
        assert_eq!(body["data"]["deletedAt"], json!(null));
    }

    #[tokio::test]
    async fn update_rejects_invalid_fields() {
        let server = test_server();
        let created = post_transaction(&server, "expense", 45.0, "coffee").await;
        let id = created["id"].as_i64().unwrap();

        let response = server
            .put(&endpoints::format_endpoint(endpoints::TRANSACTION, id))
            .json(&json!({"amount": 0}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(
            body["errors"],
            json!([{"field": "amount", "message": "Amount must be positive"}])
        );

        // The rejected patch was not applied.
        let got = server
            .get(&endpoints::format_endpoint(endpoints::TRANSACTION, id))
            .await
            .json::<Value>();
        assert_eq!(got["data"]["amount"], json!(45.0));
    }

    #[tokio::test]
    async fn update_missing_transaction_is_404() {
        let server = test_server();

        let response = server
            .put(&endpoints::format_endpoint(endpoints::TRANSACTION, 999))
            .json(&json!({"amount": 1}))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_deleted_transaction_is_404() {
        let server = test_server();
        let created = post_transaction(&server, "expense", 45.0, "coffee").await;
        let id = created["id"].as_i64().unwrap();
        server
            .delete(&endpoints::format_endpoint(endpoints::TRANSACTION, id))
            .await
            .assert_status(StatusCode::OK);

        let response = server
            .put(&endpoints::format_endpoint(endpoints::TRANSACTION, id))
            .json(&json!({"amount": 1}))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
