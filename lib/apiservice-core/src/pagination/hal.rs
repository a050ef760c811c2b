use serde_json::Value;

use super::{PaginationResolver, header_value};
use crate::model::{Pagination, PaginationLinks};
use crate::transport::Response;

/// Dotted paths of the pagination values in a HAL document.
///
/// When the walk reaches a string (usually an `href`), the next segment is
/// read as a query parameter of that URL: `_links.self.href.page` reads
/// `page` from `/features?page=2`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct HalPaginationPaths {
    /// Current page, `_links.self.href.page` by default.
    pub page: String,
    /// Items per page, `itemsPerPage` by default.
    pub per_page: String,
    /// Total number of items, `totalItems` by default.
    pub total_items: String,
    /// Total number of pages, `_links.last.href.page` by default.
    pub total_pages: String,
}

impl Default for HalPaginationPaths {
    fn default() -> Self {
        Self {
            page: "_links.self.href.page".to_string(),
            per_page: "itemsPerPage".to_string(),
            total_items: "totalItems".to_string(),
            total_pages: "_links.last.href.page".to_string(),
        }
    }
}

/// Pagination read from the body of a HAL collection.
///
/// Unresolved values default to page 1, 0 items per page, 0 items and 1 page.
/// The `first` and `last` links fall back to the `self` link.
#[derive(Debug, Clone, Default)]
pub struct HalPagination {
    paths: HalPaginationPaths,
}

impl HalPagination {
    /// Creates a resolver reading the given paths.
    pub fn new(paths: HalPaginationPaths) -> Self {
        Self { paths }
    }
}

impl PaginationResolver for HalPagination {
    fn supports(&self, response: &Response) -> bool {
        header_value(response, http::header::CONTENT_TYPE.as_str()).contains("hal")
    }

    fn extract(&self, data: &Value, _response: &Response) -> Pagination {
        let href = |rel: &str| {
            data.get("_links")
                .and_then(|links| links.get(rel))
                .and_then(|link| link.get("href"))
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let this = href("self");
        let links = PaginationLinks::new(
            href("first").or_else(|| this.clone()).unwrap_or_default(),
            href("last").or(this).unwrap_or_default(),
        )
        .with_next(href("next"))
        .with_prev(href("prev"));

        Pagination::new(
            lookup(data, &self.paths.page).unwrap_or(1),
            lookup(data, &self.paths.per_page).unwrap_or(0),
            lookup(data, &self.paths.total_items).unwrap_or(0),
            lookup(data, &self.paths.total_pages).unwrap_or(1),
        )
        .with_links(links)
    }
}

fn lookup(data: &Value, path: &str) -> Option<u64> {
    let mut current = data;
    for segment in path.split('.') {
        match current {
            Value::Object(fields) => current = fields.get(segment)?,
            Value::String(href) => return query_parameter(href, segment),
            _ => return None,
        }
    }

    match current {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn query_parameter(href: &str, name: &str) -> Option<u64> {
    let query = href.split_once('?').map_or(href, |(_, query)| query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .and_then(|(_, value)| value.parse().ok())
}
