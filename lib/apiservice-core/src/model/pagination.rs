/// Page metadata of a collection.
///
/// `page` and `total_pages` are never lower than 1.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    page: u64,
    per_page: u64,
    total_items: u64,
    total_pages: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    links: Option<PaginationLinks>,
}

impl Pagination {
    /// Creates a pagination, `page` and `total_pages` are raised to 1.
    pub fn new(page: u64, per_page: u64, total_items: u64, total_pages: u64) -> Self {
        Self {
            page: page.max(1),
            per_page,
            total_items,
            total_pages: total_pages.max(1),
            links: None,
        }
    }

    /// Sets the navigation links.
    pub fn with_links(mut self, links: PaginationLinks) -> Self {
        self.links = Some(links);
        self
    }

    /// Current page, starting at 1.
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Items per page.
    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Total number of items.
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Total number of pages, at least 1.
    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Navigation links, if known.
    pub fn links(&self) -> Option<&PaginationLinks> {
        self.links.as_ref()
    }

    /// Whether navigation links are known.
    pub fn has_links(&self) -> bool {
        self.links.is_some()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 0, 0, 1)
    }
}

/// Navigation links of a paginated collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct PaginationLinks {
    first: String,
    last: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prev: Option<String>,
}

impl PaginationLinks {
    /// Creates links without `next` nor `prev`.
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
            next: None,
            prev: None,
        }
    }

    /// Sets the `next` link.
    pub fn with_next(mut self, next: Option<String>) -> Self {
        self.next = next;
        self
    }

    /// Sets the `prev` link.
    pub fn with_prev(mut self, prev: Option<String>) -> Self {
        self.prev = prev;
        self
    }

    /// Link to the first page.
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Link to the last page.
    pub fn last(&self) -> &str {
        &self.last
    }

    /// Link to the next page, if any.
    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// Link to the previous page, if any.
    pub fn prev(&self) -> Option<&str> {
        self.prev.as_deref()
    }

    /// Whether there is a next page.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Whether there is a previous page.
    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }
}
