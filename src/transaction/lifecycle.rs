//! The soft-delete lifecycle for transactions.
//!
//! A transaction is in one of two states: active (`deleted_at` is null) or
//! deleted (`deleted_at` holds the deletion time). Each transition is a
//! single conditional UPDATE keyed on both the ID and the current state, so
//! two racing calls cannot both succeed. An ID that is absent and an ID in
//! the wrong state are both reported as [Error::NotFound]; callers cannot
//! tell the two apart.

use rusqlite::{Connection, params};
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId};

use super::core::{TRANSACTION_COLUMNS, Transaction, encode_timestamp, map_transaction_row};

/// Soft-delete an active transaction, stamping `deleted_at` with the
/// current time.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` is absent or the transaction is already deleted,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn soft_delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let timestamp = encode_timestamp(OffsetDateTime::now_utc())?;

    let transaction = connection
        .prepare(&format!(
            "UPDATE \"transaction\" SET deleted_at = ?1, updated_at = ?1
             WHERE id = ?2 AND deleted_at IS NULL
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(params![timestamp, id], map_transaction_row)?;

    Ok(transaction)
}

/// Restore a soft-deleted transaction, clearing `deleted_at`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` is absent or the transaction is not deleted,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn restore_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let timestamp = encode_timestamp(OffsetDateTime::now_utc())?;

    let transaction = connection
        .prepare(&format!(
            "UPDATE \"transaction\" SET deleted_at = NULL, updated_at = ?1
             WHERE id = ?2 AND deleted_at IS NOT NULL
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(params![timestamp, id], map_transaction_row)?;

    Ok(transaction)
}

#[cfg(test)]
mod lifecycle_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        transaction::{TransactionKind, create_transaction, get_transaction},
        validation::NewTransaction,
    };

    use super::{restore_transaction, soft_delete_transaction};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_test_transaction(conn: &Connection) -> crate::transaction::Transaction {
        create_transaction(
            NewTransaction {
                kind: TransactionKind::Expense,
                amount: 45.0,
                description: "coffee".to_owned(),
                date: None,
            },
            conn,
        )
        .expect("Could not create transaction")
    }

    #[test]
    fn soft_delete_stamps_deleted_at() {
        let conn = get_test_connection();
        let transaction = create_test_transaction(&conn);

        let deleted = soft_delete_transaction(transaction.id, &conn)
            .expect("Could not delete transaction");

        assert!(deleted.deleted_at.is_some());
        assert_eq!(deleted.id, transaction.id);
    }

    #[test]
    fn deleted_transaction_is_hidden_from_get() {
        let conn = get_test_connection();
        let transaction = create_test_transaction(&conn);
        soft_delete_transaction(transaction.id, &conn).unwrap();

        let result = get_transaction(transaction.id, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn double_delete_is_not_found() {
        let conn = get_test_connection();
        let transaction = create_test_transaction(&conn);
        soft_delete_transaction(transaction.id, &conn).unwrap();

        let result = soft_delete_transaction(transaction.id, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction_is_not_found() {
        let conn = get_test_connection();

        let result = soft_delete_transaction(999, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn restore_undoes_a_delete_except_updated_at() {
        let conn = get_test_connection();
        let transaction = create_test_transaction(&conn);
        soft_delete_transaction(transaction.id, &conn).unwrap();

        let restored = restore_transaction(transaction.id, &conn)
            .expect("Could not restore transaction");

        assert_eq!(restored.deleted_at, None);
        assert_eq!(restored.id, transaction.id);
        assert_eq!(restored.kind, transaction.kind);
        assert_eq!(restored.amount, transaction.amount);
        assert_eq!(restored.description, transaction.description);
        assert_eq!(restored.date, transaction.date);
        assert_eq!(restored.created_at, transaction.created_at);

        // The restored record is visible to the default fetch again.
        assert_eq!(get_transaction(transaction.id, &conn), Ok(restored));
    }

    #[test]
    fn restore_active_transaction_is_not_found() {
        let conn = get_test_connection();
        let transaction = create_test_transaction(&conn);

        let result = restore_transaction(transaction.id, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn restore_missing_transaction_is_not_found() {
        let conn = get_test_connection();

        let result = restore_transaction(999, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }
}
