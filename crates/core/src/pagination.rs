//! Pagination for catalog listings
//!
//! Offset pagination with 1-indexed page numbers. Out-of-range values are
//! clamped rather than rejected: page 0 becomes page 1, a page size above
//! [`MAX_PAGE_SIZE`] is capped, and a page past the end yields an empty
//! page with accurate totals so clients can walk backwards.

use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum number of items per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// Normalized page request, 1-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request from raw query values, clamping into the valid range
    pub fn from_params(page: Option<u32>, page_size: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Self { page, page_size }
    }

    /// Zero-based offset of the first item on this page
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    pub fn limit(&self) -> u64 {
        self.page_size as u64
    }

    /// Slice one page out of an already-ordered candidate list
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = self.offset() as usize;
        if start >= items.len() {
            return Vec::new();
        }
        let end = (start + self.page_size as usize).min(items.len());
        items[start..end].to_vec()
    }
}

/// One page of results with navigation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Assemble a page from the items of this page plus the unfiltered total
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            total_items.div_ceil(request.page_size as u64)
        };
        Self {
            has_next: (request.page as u64) < total_pages,
            has_previous: request.page > 1 && total_items > 0,
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages,
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Map the items while keeping the page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageRequest::from_params(None, None);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_page_zero_clamps_to_one() {
        let request = PageRequest::from_params(Some(0), None);
        assert_eq!(request.page, 1);
    }

    #[test]
    fn test_page_size_capped() {
        let request = PageRequest::from_params(None, Some(500));
        assert_eq!(request.page_size, MAX_PAGE_SIZE);

        let request = PageRequest::from_params(None, Some(0));
        assert_eq!(request.page_size, 1);
    }

    #[test]
    fn test_offset_is_one_indexed() {
        let request = PageRequest::from_params(Some(3), Some(20));
        assert_eq!(request.offset(), 40);
    }

    #[test]
    fn test_slice_past_end_is_empty() {
        let items: Vec<u32> = (0..5).collect();
        let request = PageRequest::from_params(Some(4), Some(2));
        assert!(request.slice(&items).is_empty());
    }

    #[test]
    fn test_page_metadata() {
        let request = PageRequest::from_params(Some(2), Some(10));
        let page = Page::new(vec![1; 10], request, 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn test_last_page_has_no_next() {
        let request = PageRequest::from_params(Some(3), Some(10));
        let page = Page::new(vec![1; 5], request, 25);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn test_empty_result_set() {
        let page = Page::<u32>::empty(PageRequest::default());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn test_page_past_end_keeps_totals() {
        let request = PageRequest::from_params(Some(9), Some(10));
        let page = Page::new(Vec::<u32>::new(), request, 25);
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 25);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }
}
