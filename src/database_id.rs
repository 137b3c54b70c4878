//! Type aliases for database row identifiers.

/// The integer row ID assigned by SQLite.
pub type DatabaseId = i64;

/// The ID of a transaction record.
pub type TransactionId = DatabaseId;
