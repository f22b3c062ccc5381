// Offset pagination for audit queries
use serde::{Deserialize, Serialize};

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, starting at 1
    pub page: u32,
    /// Entries per page
    pub limit: u32,
}

impl PageRequest {
    /// Build a request, clamping `page` and `limit` to at least 1.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Number of rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> u32 {
        (self.page.max(1) - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// One page of query results plus totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let limit = request.limit.max(1);
        let total_pages = total.div_ceil(u64::from(limit)) as u32;

        Self {
            items,
            total,
            page: request.page,
            limit,
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(2, 10).offset(), 10);
        assert_eq!(PageRequest::new(3, 25).offset(), 50);
    }

    #[test]
    fn test_zero_page_clamped() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_total_pages() {
        let page: Page<u32> = Page::new(vec![], 21, PageRequest::new(1, 10));
        assert_eq!(page.total_pages, 3);

        let empty: Page<u32> = Page::new(vec![], 0, PageRequest::new(1, 10));
        assert_eq!(empty.total_pages, 0);
        assert!(empty.is_empty());
    }
}
