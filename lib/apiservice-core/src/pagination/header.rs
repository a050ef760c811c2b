use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use super::{PaginationResolver, header_value};
use crate::model::{Pagination, PaginationLinks};
use crate::transport::Response;

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(?<url>[^>]*)>[^,]*?;\s*rel="(?<rel>[^"]+)""#).expect("a valid regex")
});

/// Names of the response headers carrying the pagination.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PaginationHeaders {
    /// Current page, `X-Page` by default.
    pub page: String,
    /// Items per page, `X-Per-Page` by default.
    pub per_page: String,
    /// Total number of items, `X-Total-Items` by default.
    pub total_items: String,
    /// Total number of pages, `X-Total-Pages` by default.
    pub total_pages: String,
}

impl Default for PaginationHeaders {
    fn default() -> Self {
        Self {
            page: "X-Page".to_string(),
            per_page: "X-Per-Page".to_string(),
            total_items: "X-Total-Items".to_string(),
            total_pages: "X-Total-Pages".to_string(),
        }
    }
}

impl PaginationHeaders {
    fn names(&self) -> [&str; 4] {
        [
            self.page.as_str(),
            self.per_page.as_str(),
            self.total_items.as_str(),
            self.total_pages.as_str(),
        ]
    }
}

/// Pagination read from response headers.
///
/// Navigation links come from an RFC 5988 `Link` header
/// (`<https://api/items?page=2>; rel="next"`), when present.
#[derive(Debug, Clone, Default)]
pub struct HeaderPagination {
    headers: PaginationHeaders,
}

impl HeaderPagination {
    /// Creates a resolver reading the given headers.
    pub fn new(headers: PaginationHeaders) -> Self {
        Self { headers }
    }

    fn number(response: &Response, name: &str) -> u64 {
        let value = header_value(response, name);
        value.trim().parse().unwrap_or_else(|_| {
            warn!(header = name, value, "invalid pagination header");
            0
        })
    }
}

impl PaginationResolver for HeaderPagination {
    fn supports(&self, response: &Response) -> bool {
        self.headers
            .names()
            .into_iter()
            .all(|name| !header_value(response, name).is_empty())
    }

    fn extract(&self, _data: &Value, response: &Response) -> Pagination {
        let pagination = Pagination::new(
            Self::number(response, &self.headers.page),
            Self::number(response, &self.headers.per_page),
            Self::number(response, &self.headers.total_items),
            Self::number(response, &self.headers.total_pages),
        );

        let mut values = response.headers().get_all(http::header::LINK).iter().peekable();
        if values.peek().is_none() {
            return pagination;
        }

        let (mut first, mut last, mut next, mut prev) = (String::new(), String::new(), None, None);
        for value in values.filter_map(|it| it.to_str().ok()) {
            for captures in LINK.captures_iter(value) {
                let (Some(url), Some(rel)) = (captures.name("url"), captures.name("rel")) else {
                    continue;
                };
                let url = url.as_str().trim().to_string();
                match rel.as_str() {
                    "first" => first = url,
                    "last" => last = url,
                    "next" => next = Some(url),
                    "prev" => prev = Some(url),
                    _ => {}
                }
            }
        }

        pagination.with_links(PaginationLinks::new(first, last).with_next(next).with_prev(prev))
    }
}
