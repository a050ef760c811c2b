use std::sync::Arc;

use serde_json::Value;

use super::{HalPagination, HeaderPagination, PaginationResolver};
use crate::ApiServiceError;

/// The available pagination strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum PaginationFactory {
    /// [`HeaderPagination`], options are [`PaginationHeaders`](super::PaginationHeaders).
    #[display("header")]
    Header,
    /// [`HalPagination`], options are [`HalPaginationPaths`](super::HalPaginationPaths).
    #[display("hal")]
    Hal,
}

/// Serializable selection of the pagination resolver.
///
/// ```
/// # use apiservice_core::pagination::PaginationConfig;
/// let config: PaginationConfig = serde_json::from_str(
///     r#"{"factory": "header", "options": {"page": "Page"}}"#,
/// )?;
/// let resolver = config.build()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct PaginationConfig {
    /// The strategy.
    pub factory: PaginationFactory,
    /// Strategy options, missing keys use the defaults.
    #[serde(default)]
    pub options: Value,
}

impl PaginationConfig {
    /// Builds the configured resolver.
    ///
    /// # Errors
    ///
    /// Fails when the options do not match the selected strategy.
    pub fn build(&self) -> Result<Arc<dyn PaginationResolver>, ApiServiceError> {
        let resolver: Arc<dyn PaginationResolver> = match self.factory {
            PaginationFactory::Header => Arc::new(HeaderPagination::new(self.options()?)),
            PaginationFactory::Hal => Arc::new(HalPagination::new(self.options()?)),
        };
        Ok(resolver)
    }

    fn options<T>(&self) -> Result<T, ApiServiceError>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.options.is_null() {
            return Ok(T::default());
        }

        serde_path_to_error::deserialize(&self.options).map_err(|error| {
            ApiServiceError::InvalidPaginationOptions {
                factory: self.factory.to_string(),
                error,
            }
        })
    }
}
