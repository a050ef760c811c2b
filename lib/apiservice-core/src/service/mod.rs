//! The API service: builds, validates, sends and decodes operation calls.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::ApiServiceError;
use crate::definition::SchemaProvider;
use crate::pagination::PaginationResolver;
use crate::request::RequestFactory;
use crate::serializer::Serializer;
use crate::transport::HttpClient;
use crate::validator::MessageValidator;

mod builder;
pub use self::builder::ApiServiceBuilder;

mod call;

mod config;
pub use self::config::ApiServiceConfig;

mod output;
pub use self::output::CallOutput;

#[cfg(test)]
mod tests;

/// Pending result of [`ApiService::call_async`].
pub type CallFuture = Pin<Box<dyn Future<Output = Result<CallOutput, ApiServiceError>> + Send>>;

/// Client of an API described by a schema.
///
/// Each call resolves an operation, builds its request from the caller
/// parameters, then validates, sends and decodes it:
///
/// 1. the request is validated (when `validate_request` is set),
/// 2. the request is sent and the response received,
/// 3. the response is validated (when `validate_response` is set),
/// 4. the response is returned as is (when `return_response` is set),
///    or its body is decoded into a [`Resource`](crate::model::Resource)
///    or, for statuses of 400 or more, an [`ApiError`](crate::model::ApiError).
///
/// The service is cheap to clone, all collaborators are shared.
///
/// # Example
///
/// ```rust,no_run
/// use apiservice_core::{ApiSchema, ApiService, CallParams, ReqwestClient};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let schema = ApiSchema::from_json_str(include_str!("../../tests/features.json"))?;
/// let service = ApiService::builder()
///     .with_base_uri("https://api.example.org")
///     .with_schema(schema)
///     .with_client(ReqwestClient::new())
///     .build()?;
///
/// let output = service.call("getFeature", CallParams::new().add_param("id", 1))?;
/// if let Some(resource) = output.as_resource() {
///     println!("{}", resource.data());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiService {
    request_factory: RequestFactory,
    validator: Arc<dyn MessageValidator>,
    serializer: Arc<dyn Serializer>,
    client: Arc<dyn HttpClient>,
    schema: Arc<dyn SchemaProvider>,
    pagination: Option<Arc<dyn PaginationResolver>>,
    config: ApiServiceConfig,
}

impl ApiService {
    /// Creates a builder.
    pub fn builder() -> ApiServiceBuilder {
        ApiServiceBuilder::default()
    }

    /// The call configuration.
    pub fn config(&self) -> &ApiServiceConfig {
        &self.config
    }

    /// The schema provider.
    pub fn schema(&self) -> &dyn SchemaProvider {
        self.schema.as_ref()
    }

    /// Returns a service with the `return_response` flag overridden.
    ///
    /// Collaborators are shared with this service, which is left untouched.
    #[must_use]
    pub fn with_return_response(&self, return_response: bool) -> Self {
        let mut result = self.clone();
        result.config.return_response = return_response;
        result
    }
}
