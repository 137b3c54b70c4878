//! Tally is a small REST API for tracking income and expense transactions.
//!
//! Transactions are never physically deleted. Instead, deleting a transaction
//! stamps it with a deletion time, hiding it from every route except the
//! dedicated restore endpoint. This library provides the data model, the
//! validation and query logic that enforce the lifecycle rules, and the HTTP
//! handlers that expose them.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod database_id;
mod db;
mod endpoints;
mod envelope;
mod logging;
mod pagination;
mod routing;
mod transaction;
mod validation;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use envelope::ApiResponse;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use transaction::{Transaction, TransactionKind};
pub use validation::FieldViolation;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request payload or a path parameter failed validation.
    ///
    /// Carries the ordered, field-level violations. Nothing is written to the
    /// store when this error is produced.
    #[error("validation failed")]
    Validation(Vec<FieldViolation>),

    /// The requested transaction was not found.
    ///
    /// This covers both an ID that does not exist and a transaction that is
    /// in the wrong lifecycle state for the requested operation. The two
    /// cases are deliberately not distinguished to the client.
    #[error("the requested transaction could not be found")]
    NotFound,

    /// A timestamp could not be formatted for storage.
    #[error("could not format timestamp: {0}")]
    TimestampFormat(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::failure("Validation failed").with_violations(violations)),
            )
                .into_response(),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::failure("Transaction not found")),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);

                let mut envelope = ApiResponse::<()>::failure("Internal server error");

                // Error detail is only exposed outside of release builds.
                if cfg!(debug_assertions) {
                    envelope = envelope.with_error_detail(error.to_string());
                }

                (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, FieldViolation};

    #[test]
    fn sql_errors_map_to_not_found_for_missing_rows() {
        let error = Error::from(rusqlite::Error::QueryReturnedNoRows);

        assert_eq!(error, Error::NotFound);
    }

    #[tokio::test]
    async fn validation_error_renders_bad_request() {
        let error = Error::Validation(vec![FieldViolation::new("amount", "Amount is required")]);

        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn not_found_renders_404() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
