/// Offset pagination
///
/// Clients send `page_size` and `page_number` (1-based). Missing values fall
/// back to 10 and 1; out-of-range values are clamped instead of rejected.
///
/// # Example
///
/// ```
/// use workboard_shared::models::pagination::{PageQuery, Pagination};
///
/// let page = PageQuery { page_size: Some(5), page_number: Some(3) }.normalize();
/// assert_eq!(page.offset(), 10);
///
/// let meta = Pagination::new(page, 11);
/// assert_eq!(meta.total_pages, 3);
/// ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Raw pagination query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page_size: Option<i64>,
    pub page_number: Option<i64>,
}

impl PageQuery {
    pub fn normalize(self) -> Page {
        Page {
            size: self
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            number: self.page_number.unwrap_or(1).max(1),
        }
    }
}

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub size: i64,
    pub number: i64,
}

impl Page {
    /// Rows to skip: `(number - 1) * size`
    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }
}

impl Default for Page {
    fn default() -> Self {
        PageQuery::default().normalize()
    }
}

/// Pagination metadata returned with every listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_count: i64,
    pub page_size: i64,
    pub page_number: i64,
    pub total_pages: i64,
    pub skip: i64,
}

impl Pagination {
    pub fn new(page: Page, total_count: i64) -> Self {
        let total_count = total_count.max(0);
        Self {
            total_count,
            page_size: page.size,
            page_number: page.number,
            total_pages: (total_count + page.size - 1) / page.size,
            skip: page.offset(),
        }
    }
}

/// A page of items plus its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageQuery::default().normalize();
        assert_eq!(page, Page { size: 10, number: 1 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let page = PageQuery { page_size: Some(0), page_number: Some(-4) }.normalize();
        assert_eq!(page, Page { size: 1, number: 1 });

        let page = PageQuery { page_size: Some(10_000), page_number: None }.normalize();
        assert_eq!(page.size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page { size: 10, number: 1 };
        assert_eq!(Pagination::new(page, 0).total_pages, 0);
        assert_eq!(Pagination::new(page, 1).total_pages, 1);
        assert_eq!(Pagination::new(page, 10).total_pages, 1);
        assert_eq!(Pagination::new(page, 11).total_pages, 2);
    }

    #[test]
    fn test_skip_reported() {
        let page = Page { size: 25, number: 4 };
        let meta = Pagination::new(page, 200);
        assert_eq!(meta.skip, 75);
        assert_eq!(meta.page_number, 4);
        assert_eq!(meta.total_pages, 8);
    }
}
