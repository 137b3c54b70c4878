//! Database initialization for the application.

use rusqlite::Connection;

use crate::{Error, transaction::create_transaction_table};

/// Create the application tables if they do not exist.
///
/// # Errors
/// Returns an error if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_transaction_table(connection)?;

    Ok(())
}
