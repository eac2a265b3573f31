//! REST API modules: the response envelope, error rendering, and the
//! per-resource handlers.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod health;
pub mod orders;
pub mod products;

pub use error::{ApiError, ApiResult};

use pagination::PageParams;

/// Parse raw `page`/`limit` query values leniently: anything that is
/// not a number falls back to the default, then both are clamped.
/// Pagination parameters clamp; they never 400.
#[must_use]
pub(crate) fn page_params(page: Option<&str>, limit: Option<&str>) -> PageParams {
    PageParams::from_query(
        page.and_then(|raw| raw.parse().ok()),
        limit.and_then(|raw| raw.parse().ok()),
    )
}
