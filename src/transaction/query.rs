//! Builds the default list query for transactions from request parameters.
//!
//! The query engine is deliberately lenient: unusable pagination values fall
//! back to their defaults, an unrecognized type filter is ignored, and date
//! bounds that fail to parse are dropped. Only the store itself can fail.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    pagination::{PaginationConfig, coerce_positive, total_pages},
    validation::parse_timestamp,
};

use super::core::{
    TRANSACTION_COLUMNS, Transaction, TransactionKind, encode_timestamp, map_transaction_row,
};

/// Raw list query parameters as they appear in the URL.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// 1-based page number.
    pub page: Option<String>,
    /// Records per page.
    pub limit: Option<String>,
    /// Filter to "income" or "expense" transactions.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Inclusive lower bound on the transaction date.
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    /// Inclusive upper bound on the transaction date.
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// A normalized list query: the record filter plus pagination.
///
/// The filter always includes "not soft-deleted"; there is no way to list
/// the trash through this query.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Only include transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Only include transactions dated at or after this time.
    pub start_date: Option<OffsetDateTime>,
    /// Only include transactions dated at or before this time.
    pub end_date: Option<OffsetDateTime>,
    /// The 1-based page to return.
    pub page: u64,
    /// The number of transactions per page.
    pub limit: u64,
}

impl TransactionQuery {
    /// Normalize raw query parameters, applying defaults and dropping
    /// filter values that are not usable.
    pub fn from_params(params: ListParams, config: &PaginationConfig) -> Self {
        // Any type other than the two known values is silently ignored.
        let kind = match params.kind.as_deref() {
            Some("income") => Some(TransactionKind::Income),
            Some("expense") => Some(TransactionKind::Expense),
            _ => None,
        };

        Self {
            kind,
            start_date: params.start_date.as_deref().and_then(parse_timestamp),
            end_date: params.end_date.as_deref().and_then(parse_timestamp),
            page: coerce_positive(params.page.as_deref(), config.default_page),
            limit: coerce_positive(params.limit.as_deref(), config.default_page_size),
        }
    }

    fn where_clause(&self) -> Result<(String, Vec<Value>), Error> {
        let mut clauses = vec!["deleted_at IS NULL".to_string()];
        let mut parameters = Vec::new();

        if let Some(kind) = self.kind {
            parameters.push(Value::Text(kind.as_str().to_owned()));
            clauses.push(format!("kind = ?{}", parameters.len()));
        }

        if let Some(start_date) = self.start_date {
            parameters.push(Value::Text(encode_timestamp(start_date)?));
            clauses.push(format!("date >= ?{}", parameters.len()));
        }

        if let Some(end_date) = self.end_date {
            parameters.push(Value::Text(encode_timestamp(end_date)?));
            clauses.push(format!("date <= ?{}", parameters.len()));
        }

        Ok((clauses.join(" AND "), parameters))
    }
}

/// One page of transactions plus the metadata the envelope reports.
#[derive(Debug, PartialEq)]
pub struct TransactionPage {
    /// The transactions on this page, sorted by date descending.
    pub transactions: Vec<Transaction>,
    /// The total number of matching transactions, ignoring pagination.
    pub total: u64,
    /// The 1-based page number.
    pub page: u64,
    /// The number of pages needed to show every matching transaction.
    pub total_pages: u64,
}

/// Run `query` against the database and count the full result set.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn query_transactions(
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<TransactionPage, Error> {
    let (where_clause, parameters) = query.where_clause()?;

    // SQLite counts into a signed 64-bit integer.
    let total: i64 = connection
        .prepare(&format!(
            "SELECT COUNT(id) FROM \"transaction\" WHERE {where_clause}"
        ))?
        .query_row(params_from_iter(parameters.iter()), |row| row.get(0))?;
    let total = total as u64;

    // LIMIT and OFFSET are also signed 64-bit integers, and a huge page
    // number must not overflow the offset arithmetic.
    let limit = query.limit.min(i64::MAX as u64);
    let offset = query
        .page
        .saturating_sub(1)
        .saturating_mul(limit)
        .min(i64::MAX as u64);

    // Sort by date, then ID so that transactions on the same date keep a
    // stable order across requests.
    let select = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE {where_clause}
         ORDER BY date DESC, id DESC LIMIT {limit} OFFSET {offset}"
    );

    let transactions = connection
        .prepare(&select)?
        .query_map(params_from_iter(parameters.iter()), map_transaction_row)?
        .map(|result| result.map_err(Error::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TransactionPage {
        transactions,
        total,
        page: query.page,
        total_pages: total_pages(total, query.limit),
    })
}
