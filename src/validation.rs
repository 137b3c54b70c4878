//! Validation of transaction payloads and path identifiers.
//!
//! Each field has an ordered list of checks (required, shape, range). The
//! checks for one field stop at the first failure, but every field is
//! checked so the client sees all broken fields at once. Expected bad input
//! is always reported as a result, never a panic.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339, macros::format_description};

use crate::{Error, database_id::TransactionId, transaction::TransactionKind};

/// The maximum length of a transaction description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// The payload field that failed validation, or `"unknown"` when the
    /// failure cannot be attributed to a specific field.
    pub field: String,
    /// Why the field was rejected.
    pub message: String,
}

impl FieldViolation {
    /// Create a violation for `field`.
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: message.to_owned(),
        }
    }

    /// Create a violation that cannot be attributed to a specific field.
    pub fn unknown(message: &str) -> Self {
        Self::new("unknown", message)
    }
}

/// The raw body of a create or update request.
///
/// Fields are loosely typed so that shape errors (e.g. a numeric
/// description) surface as field violations instead of a deserialization
/// rejection.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionPayload {
    /// The raw `type` field.
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    /// The raw `amount` field.
    pub amount: Option<Value>,
    /// The raw `description` field.
    pub description: Option<Value>,
    /// The raw `date` field.
    pub date: Option<Value>,
}

/// A validated, normalized payload for creating a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionKind,
    /// The amount of money that changed hands. Strictly positive.
    pub amount: f64,
    /// What the transaction was for, trimmed of surrounding whitespace.
    pub description: String,
    /// When the transaction happened. Defaults to the creation time when
    /// absent.
    pub date: Option<OffsetDateTime>,
}

/// A validated patch for updating a transaction.
///
/// `None` fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    /// The new transaction type, if it should change.
    pub kind: Option<TransactionKind>,
    /// The new amount, if it should change. Strictly positive.
    pub amount: Option<f64>,
    /// The new description, if it should change. Trimmed, 1-200 characters.
    pub description: Option<String>,
    /// The new transaction date, if it should change.
    pub date: Option<OffsetDateTime>,
}

/// Validate the payload of a create request.
///
/// # Errors
/// Returns [Error::Validation] listing every field that failed its checks,
/// in payload order (`type`, `amount`, `description`, `date`).
pub fn validate_create(payload: TransactionPayload) -> Result<NewTransaction, Error> {
    let mut violations = Vec::new();

    // An explicitly empty string counts as missing on create.
    let kind = match payload.kind {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new("type", "Type is required"));
            None
        }
        Some(value) if value.as_str() == Some("") => {
            violations.push(FieldViolation::new("type", "Type is required"));
            None
        }
        Some(value) => check_kind(&value).map_err(|violation| violations.push(violation)).ok(),
    };

    let amount = match payload.amount {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new("amount", "Amount is required"));
            None
        }
        Some(value) => check_amount(&value).map_err(|violation| violations.push(violation)).ok(),
    };

    let description = match payload.description {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new("description", "Description is required"));
            None
        }
        Some(value) if value.as_str() == Some("") => {
            violations.push(FieldViolation::new("description", "Description is required"));
            None
        }
        Some(value) => check_description(&value).map_err(|violation| violations.push(violation)).ok(),
    };

    let date = match payload.date {
        None => None,
        Some(value) => check_date(&value).map_err(|violation| violations.push(violation)).ok(),
    };

    match (kind, amount, description) {
        (Some(kind), Some(amount), Some(description)) if violations.is_empty() => {
            Ok(NewTransaction {
                kind,
                amount,
                description,
                date,
            })
        }
        _ => Err(Error::Validation(violations)),
    }
}

/// Validate the payload of an update request.
///
/// Every field is optional, but fields that are present must satisfy the
/// same checks as [validate_create].
///
/// # Errors
/// Returns [Error::Validation] listing every field that failed its checks.
pub fn validate_update(payload: TransactionPayload) -> Result<TransactionPatch, Error> {
    let mut violations = Vec::new();
    let mut patch = TransactionPatch::default();

    if let Some(value) = payload.kind {
        match check_kind(&value) {
            Ok(kind) => patch.kind = Some(kind),
            Err(violation) => violations.push(violation),
        }
    }

    if let Some(value) = payload.amount {
        match check_amount(&value) {
            Ok(amount) => patch.amount = Some(amount),
            Err(violation) => violations.push(violation),
        }
    }

    if let Some(value) = payload.description {
        match check_description(&value) {
            Ok(description) => patch.description = Some(description),
            Err(violation) => violations.push(violation),
        }
    }

    if let Some(value) = payload.date {
        match check_date(&value) {
            Ok(date) => patch.date = Some(date),
            Err(violation) => violations.push(violation),
        }
    }

    if violations.is_empty() {
        Ok(patch)
    } else {
        Err(Error::Validation(violations))
    }
}

/// Parse a transaction ID from a request path segment.
///
/// # Errors
/// Returns [Error::Validation] if `raw` is not a well-formed store key.
pub fn parse_transaction_id(raw: &str) -> Result<TransactionId, Error> {
    raw.parse::<TransactionId>()
        .ok()
        .filter(|&id| id > 0)
        .ok_or_else(|| {
            Error::Validation(vec![FieldViolation::new("id", "Invalid transaction ID")])
        })
}

fn check_kind(value: &Value) -> Result<TransactionKind, FieldViolation> {
    match value.as_str() {
        Some("income") => Ok(TransactionKind::Income),
        Some("expense") => Ok(TransactionKind::Expense),
        _ => Err(FieldViolation::new(
            "type",
            "Type must be 'income' or 'expense'",
        )),
    }
}

fn check_amount(value: &Value) -> Result<f64, FieldViolation> {
    // Numeric strings such as "45" are accepted alongside JSON numbers.
    let amount = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    };

    let amount = amount.ok_or_else(|| FieldViolation::new("amount", "Amount must be a number"))?;

    if amount > 0.0 {
        Ok(amount)
    } else {
        Err(FieldViolation::new("amount", "Amount must be positive"))
    }
}

fn check_description(value: &Value) -> Result<String, FieldViolation> {
    let text = match value.as_str() {
        Some(text) => text,
        None => {
            return Err(FieldViolation::new(
                "description",
                "Description must be a string",
            ));
        }
    };

    let trimmed = text.trim();
    let char_count = trimmed.chars().count();

    if char_count == 0 || char_count > DESCRIPTION_MAX_CHARS {
        Err(FieldViolation::new(
            "description",
            "Description must be 1-200 characters",
        ))
    } else {
        Ok(trimmed.to_owned())
    }
}

fn check_date(value: &Value) -> Result<OffsetDateTime, FieldViolation> {
    value
        .as_str()
        .and_then(parse_timestamp)
        .ok_or_else(|| FieldViolation::new("date", "Date must be a valid ISO 8601 date"))
}

/// Parse an ISO 8601 date or date-time into a UTC timestamp.
///
/// Plain dates, e.g. "2025-01-15", are taken to mean midnight UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(timestamp) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(timestamp.to_offset(UtcOffset::UTC));
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}
