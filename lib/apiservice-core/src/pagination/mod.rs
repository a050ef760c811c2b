//! Extraction of pagination metadata from collection responses.

use std::fmt::Debug;

use serde_json::Value;
use tracing::debug;

use crate::model::Pagination;
use crate::transport::Response;

mod config;
pub use self::config::{PaginationConfig, PaginationFactory};

mod hal;
pub use self::hal::{HalPagination, HalPaginationPaths};

mod header;
pub use self::header::{HeaderPagination, PaginationHeaders};

/// Strategy reading the pagination of a collection response.
pub trait PaginationResolver: Debug + Send + Sync {
    /// Whether the response carries pagination this resolver understands.
    fn supports(&self, response: &Response) -> bool;

    /// Reads the pagination from the raw decoded body and the response.
    ///
    /// Only called when [`supports`](Self::supports) returned `true`.
    fn extract(&self, data: &Value, response: &Response) -> Pagination;
}

/// Ordered list of resolvers, the first supporting one extracts.
#[derive(Debug, Default)]
pub struct PaginationChain {
    resolvers: Vec<Box<dyn PaginationResolver>>,
}

impl PaginationChain {
    /// An empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resolver, earlier resolvers take precedence.
    pub fn with_resolver(mut self, resolver: impl PaginationResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    fn find(&self, response: &Response) -> Option<&dyn PaginationResolver> {
        self.resolvers
            .iter()
            .find(|it| it.supports(response))
            .map(AsRef::as_ref)
    }
}

impl PaginationResolver for PaginationChain {
    fn supports(&self, response: &Response) -> bool {
        self.find(response).is_some()
    }

    fn extract(&self, data: &Value, response: &Response) -> Pagination {
        match self.find(response) {
            Some(resolver) => resolver.extract(data, response),
            None => {
                debug!("no pagination resolver supports the response");
                Pagination::default()
            }
        }
    }
}

/// Reads a header as a string, empty when absent or not visible ASCII.
fn header_value<'a>(response: &'a Response, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
