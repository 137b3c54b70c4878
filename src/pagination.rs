//! This module defines the common functionality for paging data.

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to use when not specified in a request.
    pub default_page: u64,
    /// The number of records per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// Coerce a raw query string value into a positive integer.
///
/// Missing, non-numeric, and non-positive values fall back to `default`
/// rather than erroring.
pub fn coerce_positive(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(default)
}

/// The number of pages needed to show `total` records, `page_size` records
/// at a time.
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    total.div_ceil(page_size)
}
