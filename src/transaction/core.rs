//! Defines the core transaction model and its database queries.

use rusqlite::{
    Connection, Row, params, params_from_iter,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::{
    Error,
    database_id::TransactionId,
    validation::{NewTransaction, TransactionPatch},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction brought money in or sent money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money was earned.
    Income,
    /// Money was spent.
    Expense,
}

impl TransactionKind {
    /// The lowercase name used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction kind {other:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// `deleted_at` doubles as the lifecycle flag: `None` means the record is
/// active, `Some` means it was soft-deleted at that instant. Records are
/// never physically removed from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction. Assigned on insert and never changes.
    pub id: TransactionId,
    /// Whether this is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// How much money changed hands. Always strictly positive; the sign of
    /// a displayed value is derived from `kind`.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// When the transaction was soft-deleted, if it was.
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
    /// When the record was inserted. Maintained by the store.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last written. Maintained by the store.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns selected or returned by every transaction query, in the
/// order [map_transaction_row] expects them.
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, kind, amount, description, date, deleted_at, created_at, updated_at";

/// Timestamps are stored as UTC text with millisecond precision. The width
/// is fixed so that string comparison in SQL matches chronological order.
const SQL_TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

/// Format a timestamp for storage.
pub(crate) fn encode_timestamp(timestamp: OffsetDateTime) -> Result<String, Error> {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(SQL_TIMESTAMP_FORMAT)
        .map_err(|error| Error::TimestampFormat(error.to_string()))
}

fn decode_timestamp(index: usize, text: String) -> Result<OffsetDateTime, rusqlite::Error> {
    PrimitiveDateTime::parse(&text, SQL_TIMESTAMP_FORMAT)
        .map(|datetime| datetime.assume_utc())
        .map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                index,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })
}

/// Map a database row to a [Transaction].
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let deleted_at = row
        .get::<_, Option<String>>(5)?
        .map(|text| decode_timestamp(5, text))
        .transpose()?;

    Ok(Transaction {
        id: row.get(0)?,
        kind: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        date: decode_timestamp(4, row.get(4)?)?,
        deleted_at,
        created_at: decode_timestamp(6, row.get(6)?)?,
        updated_at: decode_timestamp(7, row.get(7)?)?,
    })
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                deleted_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Composite index used by the default list query.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_deleted_date
             ON \"transaction\"(deleted_at, date);",
        (),
    )?;

    Ok(())
}

/// Create a new transaction in the database from a validated payload.
///
/// The store assigns the ID and the `created_at`/`updated_at` timestamps.
/// When the payload has no date, the creation time is used.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let now = OffsetDateTime::now_utc();
    let timestamp = encode_timestamp(now)?;
    let date = encode_timestamp(new_transaction.date.unwrap_or(now))?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (kind, amount, description, date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                new_transaction.kind,
                new_transaction.amount,
                new_transaction.description,
                date,
                timestamp,
                timestamp,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve an active transaction from the database by its `id`.
///
/// Soft-deleted transactions are not visible to this query.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an active transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE id = :id AND deleted_at IS NULL"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Apply `patch` to an active transaction and bump its `updated_at`.
///
/// The update is a single conditional statement: it only succeeds if the
/// record both exists and has not been soft-deleted at write time, so a
/// concurrent delete cannot interleave with it. `id`, `created_at`, and
/// `deleted_at` are never modified by this function.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an active transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    patch: TransactionPatch,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let mut assignments = vec!["updated_at = ?1".to_string()];
    let mut parameters = vec![Value::Text(encode_timestamp(OffsetDateTime::now_utc())?)];

    if let Some(kind) = patch.kind {
        parameters.push(Value::Text(kind.as_str().to_owned()));
        assignments.push(format!("kind = ?{}", parameters.len()));
    }

    if let Some(amount) = patch.amount {
        parameters.push(Value::Real(amount));
        assignments.push(format!("amount = ?{}", parameters.len()));
    }

    if let Some(description) = patch.description {
        parameters.push(Value::Text(description));
        assignments.push(format!("description = ?{}", parameters.len()));
    }

    if let Some(date) = patch.date {
        parameters.push(Value::Text(encode_timestamp(date)?));
        assignments.push(format!("date = ?{}", parameters.len()));
    }

    parameters.push(Value::Integer(id));

    let query = format!(
        "UPDATE \"transaction\" SET {} WHERE id = ?{} AND deleted_at IS NULL
         RETURNING {TRANSACTION_COLUMNS}",
        assignments.join(", "),
        parameters.len(),
    );

    let transaction = connection
        .prepare(&query)?
        .query_row(params_from_iter(parameters.iter()), map_transaction_row)?;

    Ok(transaction)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        validation::{NewTransaction, TransactionPatch},
    };

    use super::{TransactionKind, create_transaction, get_transaction, update_transaction};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_transaction(amount: f64, description: &str) -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Expense,
            amount,
            description: description.to_owned(),
            date: None,
        }
    }

    #[test]
    fn create_assigns_id_and_timestamps() {
        let conn = get_test_connection();

        let transaction = create_transaction(new_transaction(12.3, "coffee"), &conn)
            .expect("Could not create transaction");

        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.deleted_at, None);
        assert_eq!(transaction.created_at, transaction.updated_at);
        assert_eq!(transaction.date, transaction.created_at);
    }

    #[test]
    fn create_uses_provided_date() {
        let conn = get_test_connection();
        let date = datetime!(2025-01-15 10:30 UTC);

        let transaction = create_transaction(
            NewTransaction {
                date: Some(date),
                ..new_transaction(5.0, "lunch")
            },
            &conn,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.date, date);
    }

    #[test]
    fn get_returns_stored_transaction() {
        let conn = get_test_connection();
        let created = create_transaction(new_transaction(45.0, "groceries"), &conn).unwrap();

        let got = get_transaction(created.id, &conn).expect("Could not get transaction");

        assert_eq!(got, created);
    }

    #[test]
    fn get_missing_transaction_is_not_found() {
        let conn = get_test_connection();

        let result = get_transaction(999, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_applies_patch_and_bumps_updated_at() {
        let conn = get_test_connection();
        let created = create_transaction(new_transaction(10.0, "book"), &conn).unwrap();
        let new_date = datetime!(2024-06-01 0:00 UTC);

        let updated = update_transaction(
            created.id,
            TransactionPatch {
                kind: Some(TransactionKind::Income),
                amount: Some(99.5),
                description: Some("refund".to_owned()),
                date: Some(new_date),
            },
            &conn,
        )
        .expect("Could not update transaction");

        assert_eq!(updated.kind, TransactionKind::Income);
        assert_eq!(updated.amount, 99.5);
        assert_eq!(updated.description, "refund");
        assert_eq!(updated.date, new_date);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.deleted_at, None);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn update_with_empty_patch_only_bumps_updated_at() {
        let conn = get_test_connection();
        let created = create_transaction(new_transaction(10.0, "book"), &conn).unwrap();

        let updated = update_transaction(created.id, TransactionPatch::default(), &conn)
            .expect("Could not update transaction");

        assert_eq!(updated.kind, created.kind);
        assert_eq!(updated.amount, created.amount);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.date, created.date);
    }

    #[test]
    fn update_missing_transaction_is_not_found() {
        let conn = get_test_connection();

        let result = update_transaction(999, TransactionPatch::default(), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }
}
