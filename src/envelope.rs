//! The JSON response envelope shared by all API routes.

use serde::Serialize;

use crate::validation::FieldViolation;

/// The uniform response body returned by every API route.
///
/// Only `success` is always present. The remaining fields are omitted from
/// the serialized JSON when they do not apply to the operation.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T = ()> {
    /// Whether the request succeeded.
    pub success: bool,
    /// A human-readable summary of the outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The record or records produced by the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// The number of records in `data`, for list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// The total number of matching records, ignoring pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// The current page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// The number of pages needed to show every matching record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    /// Field-level validation violations, in the order they were detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
    /// Detail of an internal error. Only populated in debug builds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn empty(success: bool) -> Self {
        Self {
            success,
            message: None,
            data: None,
            count: None,
            total: None,
            page: None,
            total_pages: None,
            errors: None,
            error: None,
        }
    }

    /// A successful response carrying only `data`.
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::empty(true)
        }
    }

    /// A successful response carrying a summary `message` and `data`.
    pub fn message(message: &str, data: T) -> Self {
        Self {
            message: Some(message.to_owned()),
            data: Some(data),
            ..Self::empty(true)
        }
    }

    /// A failed response carrying a summary `message`.
    pub fn failure(message: &str) -> Self {
        Self {
            message: Some(message.to_owned()),
            ..Self::empty(false)
        }
    }

    /// Attach field-level validation violations to the response.
    pub fn with_violations(mut self, violations: Vec<FieldViolation>) -> Self {
        self.errors = Some(violations);
        self
    }

    /// Attach internal error detail to the response.
    pub fn with_error_detail(mut self, detail: String) -> Self {
        self.error = Some(detail);
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// A successful list response with pagination metadata.
    ///
    /// `count` is derived from the length of `data`; `total` and
    /// `total_pages` describe the full result set.
    pub fn list(data: Vec<T>, total: u64, page: u64, total_pages: u64) -> Self {
        Self {
            count: Some(data.len() as u64),
            total: Some(total),
            page: Some(page),
            total_pages: Some(total_pages),
            data: Some(data),
            ..Self::empty(true)
        }
    }
}
