//! Page/limit pagination primitives shared by storefront list endpoints.
//!
//! Two halves:
//!
//! - [`PageParams`]: the inbound side. Raw `page`/`limit` query values are
//!   clamped into range rather than rejected, so a client probing with
//!   `limit=1000` gets the capped page instead of a 400. Domain fields
//!   (sort columns, enums, prices) are validated elsewhere and *do*
//!   reject; the asymmetry is deliberate.
//! - [`PageMeta`]: the outbound side. Derived entirely from
//!   `(total, page, limit)`; callers never set `totalPages` or the
//!   navigation flags directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default page number when the query omits `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size when the query omits `limit`.
pub const DEFAULT_LIMIT: u32 = 10;
/// Upper bound applied to `limit`.
pub const MAX_LIMIT: u32 = 100;

/// Clamped pagination parameters for a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    page: u32,
    limit: u32,
}

impl PageParams {
    /// Build parameters from optional query values, clamping both into
    /// range: `page < 1` becomes 1, `limit` is forced into `[1, 100]`.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageParams;
    ///
    /// let params = PageParams::from_query(Some(0), Some(500));
    /// assert_eq!(params.page(), 1);
    /// assert_eq!(params.limit(), 100);
    /// ```
    #[must_use]
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    /// One-based page number, always at least 1.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page size, always within `[1, 100]`.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Zero-based offset of the first row on this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Zero-based offset of the last row on this page (inclusive), as
    /// used by `Range`-style row requests.
    #[must_use]
    pub fn range_end(&self) -> u64 {
        self.offset() + u64::from(self.limit) - 1
    }

    /// Derive the response metadata for this page given the total row
    /// count reported by the store.
    #[must_use]
    pub fn meta(&self, total: u64) -> PageMeta {
        PageMeta::new(total, self.page, self.limit)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::from_query(None, None)
    }
}

/// Derived pagination block included in paginated envelopes.
///
/// Invariants: `total_pages = ceil(total / limit)`,
/// `has_next_page = page < total_pages`, `has_prev_page = page > 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total rows matching the query across all pages.
    pub total: u64,
    /// One-based page number that was served.
    pub page: u32,
    /// Effective (clamped) page size.
    pub limit: u32,
    /// Number of pages needed to cover `total` rows.
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
}

impl PageMeta {
    /// Derive the metadata block from the row count and the served page.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageMeta;
    ///
    /// let meta = PageMeta::new(25, 1, 10);
    /// assert_eq!(meta.total_pages, 3);
    /// assert!(meta.has_next_page);
    /// assert!(!meta.has_prev_page);
    /// ```
    #[must_use]
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let total_pages = total.div_ceil(u64::from(limit));
        Self {
            total,
            page,
            limit,
            total_pages,
            has_next_page: u64::from(page) < total_pages,
            has_prev_page: page > 1,
        }
    }
}

/// Sort direction accepted by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order.
    Asc,
    /// Descending order, the default for every list endpoint.
    Desc,
}

impl SortOrder {
    /// Keyword used on the wire and in store queries.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Desc
    }
}

/// Error returned when a sort direction keyword is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid sort order. Must be \"asc\" or \"desc\"")]
pub struct SortOrderParseError;

impl std::str::FromStr for SortOrder {
    type Err = SortOrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(SortOrderParseError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::defaults(None, None, 1, 10)]
    #[case::zero_page(Some(0), Some(10), 1, 10)]
    #[case::oversized_limit(Some(2), Some(500), 2, 100)]
    #[case::zero_limit(Some(3), Some(0), 3, 1)]
    #[case::in_range(Some(4), Some(25), 4, 25)]
    fn from_query_clamps(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let params = PageParams::from_query(page, limit);
        assert_eq!(params.page(), expected_page);
        assert_eq!(params.limit(), expected_limit);
    }

    #[test]
    fn offsets_cover_the_requested_page() {
        let params = PageParams::from_query(Some(3), Some(10));
        assert_eq!(params.offset(), 20);
        assert_eq!(params.range_end(), 29);
    }

    #[rstest]
    #[case::first_of_three(25, 1, 10, 3, true, false)]
    #[case::middle(25, 2, 10, 3, true, true)]
    #[case::last(25, 3, 10, 3, false, true)]
    #[case::empty(0, 1, 10, 0, false, false)]
    #[case::exact_fit(20, 2, 10, 2, false, true)]
    #[case::past_the_end(5, 9, 10, 1, false, true)]
    fn meta_derives_navigation(
        #[case] total: u64,
        #[case] page: u32,
        #[case] limit: u32,
        #[case] total_pages: u64,
        #[case] has_next: bool,
        #[case] has_prev: bool,
    ) {
        let meta = PageMeta::new(total, page, limit);
        assert_eq!(meta.total_pages, total_pages);
        assert_eq!(meta.has_next_page, has_next);
        assert_eq!(meta.has_prev_page, has_prev);
    }

    #[test]
    fn meta_serialises_camel_case() {
        let meta = PageMeta::new(25, 1, 10);
        let value = serde_json::to_value(meta).expect("meta serialises");
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["hasNextPage"], true);
        assert_eq!(value["hasPrevPage"], false);
        assert_eq!(value["total"], 25);
    }

    #[rstest]
    #[case("asc", SortOrder::Asc)]
    #[case("DESC", SortOrder::Desc)]
    fn sort_order_parses_known_keywords(#[case] raw: &str, #[case] expected: SortOrder) {
        assert_eq!(raw.parse::<SortOrder>().expect("keyword parses"), expected);
    }

    #[test]
    fn sort_order_rejects_unknown_keyword() {
        let err = "sideways".parse::<SortOrder>().expect_err("must reject");
        assert!(err.to_string().contains("asc"));
    }
}
