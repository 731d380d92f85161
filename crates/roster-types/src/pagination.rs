//! Page/limit arithmetic shared by the service and the client.

use std::ops::RangeInclusive;

/// Page used when the request omits one or supplies an unusable value.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the request omits one or supplies an unusable value.
pub const DEFAULT_LIMIT: u32 = 5;

/// Largest page size the service will return in one response.
pub const MAX_LIMIT: u32 = 100;

/// A validated pagination request. `page` and `limit` are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a request, replacing zero with the defaults and clamping `limit`
    /// to [`MAX_LIMIT`].
    pub fn new(page: u32, limit: u32) -> Self {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit.min(MAX_LIMIT) };
        Self { page, limit }
    }

    /// Parses raw query-string values.
    ///
    /// Missing, non-numeric, zero and negative values fall back to the
    /// defaults instead of failing the request.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(parse_positive(page), parse_positive(limit))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

fn parse_positive(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

/// Number of pages needed to show `total` records, `ceil(total / limit)`.
///
/// Returns 0 when there are no records.
pub fn page_count(total: i64, limit: u32) -> u32 {
    if total <= 0 || limit == 0 {
        return 0;
    }
    let limit = i64::from(limit);
    let pages = (total + limit - 1) / limit;
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Every page number from 1 to [`page_count`], inclusive.
pub fn page_numbers(total: i64, limit: u32) -> RangeInclusive<u32> {
    1..=page_count(total, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_query_is_missing() {
        let req = PageRequest::from_query(None, None);
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), 5);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn unusable_values_fall_back_to_defaults() {
        for raw in ["abc", "", "0", "-3", "2.5", "99999999999"] {
            let req = PageRequest::from_query(Some(raw), Some(raw));
            assert_eq!(req, PageRequest::default(), "input {raw:?}");
        }
    }

    #[test]
    fn limit_is_clamped() {
        let req = PageRequest::from_query(Some("2"), Some("5000"));
        assert_eq!(req.limit(), MAX_LIMIT);
        assert_eq!(req.offset(), i64::from(MAX_LIMIT));
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let req = PageRequest::from_query(Some(" 3 "), Some("5"));
        assert_eq!(req.page(), 3);
        assert_eq!(req.offset(), 10);

        let far = PageRequest::new(u32::MAX, MAX_LIMIT);
        assert_eq!(far.offset(), i64::from(u32::MAX - 1) * 100);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
        assert_eq!(page_count(12, 5), 3);
        assert_eq!(page_count(12, 0), 0);
    }

    #[test]
    fn page_numbers_cover_every_page() {
        assert_eq!(page_numbers(12, 5).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(page_numbers(0, 5).count(), 0);
    }
}
