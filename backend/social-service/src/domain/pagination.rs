use serde::{Deserialize, Serialize};

/// 1-based page request used by the follower/following/comment listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit as usize
    }
}

/// A page of results.
///
/// `next_cursor` is set by cursor-paginated views (the feed) when more items
/// exist; offset-paginated listings leave it empty and report `page`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: Option<u32>,
    pub limit: u32,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn empty(page: Option<u32>, limit: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            limit,
            has_more: false,
            next_cursor: None,
        }
    }

    /// Build a page from `limit + 1` fetched rows; the extra row only signals `has_more`.
    pub fn from_overfetch(mut rows: Vec<T>, request: PageRequest) -> Self {
        let has_more = rows.len() > request.limit as usize;
        rows.truncate(request.limit as usize);
        Self {
            items: rows,
            page: Some(request.page),
            limit: request.limit,
            has_more,
            next_cursor: None,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            has_more: self.has_more,
            next_cursor: self.next_cursor,
        }
    }

    /// Like `map`, dropping items that no longer resolve. `has_more` keeps
    /// describing the underlying rows.
    pub fn filter_map<U>(self, f: impl FnMut(T) -> Option<U>) -> Page<U> {
        Page {
            items: self.items.into_iter().filter_map(f).collect(),
            page: self.page,
            limit: self.limit,
            has_more: self.has_more,
            next_cursor: self.next_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 20).offset(), 40);
    }

    #[test]
    fn test_from_overfetch() {
        let page = Page::from_overfetch(vec![1, 2, 3], PageRequest::new(1, 2));
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_more);

        let page = Page::from_overfetch(vec![1, 2], PageRequest::new(2, 2));
        assert!(!page.has_more);
        assert_eq!(page.page, Some(2));
    }
}
