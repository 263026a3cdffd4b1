//! Pagination types for list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::config::{DEFAULT_LIMIT, DEFAULT_SKIP};

/// Offset/limit query parameters.
///
/// Values are signed so anything beyond `i64::MAX` fails to parse instead of
/// reaching the query builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Number of users to skip
    #[serde(default = "default_skip")]
    #[validate(range(min = 0, message = "skip must not be negative"))]
    #[param(default = 0, minimum = 0)]
    pub skip: i64,
    /// Maximum number of users to return
    #[serde(default = "default_limit")]
    #[validate(range(min = 0, message = "limit must not be negative"))]
    #[param(default = 10, minimum = 0)]
    pub limit: i64,
}

fn default_skip() -> i64 {
    DEFAULT_SKIP
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl PaginationParams {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }

    /// Offset for the database query
    pub fn offset(&self) -> u64 {
        u64::try_from(self.skip).unwrap_or(0)
    }

    /// Row limit for the database query
    pub fn limit(&self) -> u64 {
        u64::try_from(self.limit).unwrap_or(0)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
        }
    }
}
