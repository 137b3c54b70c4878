//! Transaction management for the API.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the SQL that stores it
//! - The soft-delete lifecycle (delete and restore transitions)
//! - The list query engine (filtering, sorting, pagination)
//! - The route handlers for the `/api/transactions` endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod lifecycle;
mod list_endpoint;
mod query;
mod restore_endpoint;
mod update_endpoint;

#[cfg(test)]
pub mod test_utils;

pub use self::core::{
    Transaction, TransactionKind, create_transaction, create_transaction_table, get_transaction,
    update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use lifecycle::{restore_transaction, soft_delete_transaction};
pub use list_endpoint::list_transactions_endpoint;
pub use query::{ListParams, TransactionQuery, query_transactions};
pub use restore_endpoint::restore_transaction_endpoint;
pub use update_endpoint::update_transaction_endpoint;
