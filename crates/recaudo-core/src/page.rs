//! Shared pagination arithmetic for list endpoints and report queries.

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 50;
/// Hard cap applied by the request-parsing layer; plan construction
/// itself leaves the limit untouched.
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageParams {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Defaulting + clamping entry point for caller-supplied query params.
    pub fn from_query(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Paginated result set; `total_pages == ceil(total / limit)`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, params: PageParams) -> Self {
        let total_pages = if params.limit > 0 {
            let q = total / params.limit;
            let r = total % params.limit;
            if r > 0 {
                q + 1
            } else {
                q
            }
        } else {
            0
        };
        Self {
            data,
            total,
            page: params.page,
            limit: params.limit,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based_page_arithmetic() {
        assert_eq!(PageParams::new(1, 50).offset(), 0);
        assert_eq!(PageParams::new(2, 10).offset(), 10);
        assert_eq!(PageParams::new(5, 25).offset(), 100);
    }

    #[test]
    fn from_query_defaults_and_clamps() {
        let p = PageParams::from_query(None, None);
        assert_eq!(p, PageParams::new(DEFAULT_PAGE, DEFAULT_LIMIT));

        let p = PageParams::from_query(Some(0), Some(500));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, MAX_LIMIT);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 101, PageParams::new(1, 50));
        assert_eq!(page.total_pages, 3);

        let exact = Page::<i32>::new(vec![], 100, PageParams::new(1, 50));
        assert_eq!(exact.total_pages, 2);

        let empty = Page::<i32>::new(vec![], 0, PageParams::new(1, 50));
        assert_eq!(empty.total_pages, 0);
    }
}
