//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}',
//! use `format_endpoint`.

/// The root route, which describes the service.
pub const ROOT: &str = "/";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to fetch, update, or soft-delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to restore a soft-deleted transaction.
pub const RESTORE_TRANSACTION: &str = "/api/transactions/{transaction_id}/restore";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string delimited by braces, e.g. '{transaction_id}' in
/// '/api/transactions/{transaction_id}'. If no parameter is found in
/// `endpoint_path`, the function returns the original `endpoint_path`.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    match (endpoint_path.find('{'), endpoint_path.find('}')) {
        (Some(start), Some(end)) if start < end => {
            format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end + 1..])
        }
        _ => endpoint_path.to_string(),
    }
}
