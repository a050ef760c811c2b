use std::sync::Arc;

use url::Url;

use super::{ApiService, ApiServiceConfig};
use crate::ApiServiceError;
use crate::definition::SchemaProvider;
use crate::pagination::{PaginationConfig, PaginationResolver};
use crate::request::RequestFactory;
use crate::serializer::{DefaultSerializer, Serializer};
use crate::transport::HttpClient;
use crate::validator::{MessageValidator, NoopValidator};

/// Builder for [`ApiService`].
///
/// # Default Configuration
///
/// - **Base URI**: none, it is required
/// - **Schema**: none, it is required
/// - **Client**: none, it is required
/// - **Validator**: [`NoopValidator`]
/// - **Serializer**: [`DefaultSerializer`] (JSON, HAL flattening)
/// - **Pagination**: none, collections are not paginated
/// - **Request and response validation**: enabled
/// - **Return response**: disabled
///
/// # Example
///
/// ```rust
/// use apiservice_core::{ApiSchema, ApiService, AsyncReqwestClient};
/// use apiservice_core::pagination::HalPagination;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = ApiService::builder()
///     .with_base_uri("https://api.example.org")
///     .with_schema(ApiSchema::default())
///     .with_client(AsyncReqwestClient::new())
///     .with_pagination(HalPagination::default())
///     .with_validate_response(false)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ApiServiceBuilder {
    base_uri: Option<String>,
    validate_request: bool,
    validate_response: bool,
    return_response: bool,
    validator: Option<Arc<dyn MessageValidator>>,
    serializer: Option<Arc<dyn Serializer>>,
    client: Option<Arc<dyn HttpClient>>,
    schema: Option<Arc<dyn SchemaProvider>>,
    pagination: Option<Arc<dyn PaginationResolver>>,
}

impl Default for ApiServiceBuilder {
    fn default() -> Self {
        Self {
            base_uri: None,
            validate_request: true,
            validate_response: true,
            return_response: false,
            validator: None,
            serializer: None,
            client: None,
            schema: None,
            pagination: None,
        }
    }
}

impl ApiServiceBuilder {
    /// Builds the service.
    ///
    /// # Errors
    ///
    /// Fails when the base URI, the schema or the client is missing, or when
    /// the base URI is not an absolute URL.
    pub fn build(self) -> Result<ApiService, ApiServiceError> {
        let Self {
            base_uri,
            validate_request,
            validate_response,
            return_response,
            validator,
            serializer,
            client,
            schema,
            pagination,
        } = self;

        let base_uri = base_uri.ok_or(ApiServiceError::MissingConfiguration { field: "baseUri" })?;
        Url::parse(&base_uri)?;
        let schema = schema.ok_or(ApiServiceError::MissingConfiguration { field: "schema" })?;
        let client = client.ok_or(ApiServiceError::MissingConfiguration { field: "client" })?;

        let validator = validator.unwrap_or_else(|| Arc::new(NoopValidator));
        let serializer = serializer.unwrap_or_else(|| Arc::new(DefaultSerializer::default()));
        let request_factory = RequestFactory::new(Arc::clone(&serializer));

        Ok(ApiService {
            request_factory,
            validator,
            serializer,
            client,
            schema,
            pagination,
            config: ApiServiceConfig {
                base_uri,
                validate_request,
                validate_response,
                return_response,
            },
        })
    }

    /// Applies a whole configuration.
    ///
    /// ```rust
    /// use apiservice_core::{ApiSchema, ApiService, ApiServiceConfig, ReqwestClient};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config: ApiServiceConfig = serde_json::from_str(r#"{"baseUri": "http://localhost:8080"}"#)?;
    /// let service = ApiService::builder()
    ///     .with_config(config)
    ///     .with_schema(ApiSchema::default())
    ///     .with_client(ReqwestClient::new())
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn with_config(mut self, config: ApiServiceConfig) -> Self {
        let ApiServiceConfig {
            base_uri,
            validate_request,
            validate_response,
            return_response,
        } = config;
        self.base_uri = Some(base_uri);
        self.validate_request = validate_request;
        self.validate_response = validate_response;
        self.return_response = return_response;
        self
    }

    /// Sets the base URI, its path and query are replaced by each operation.
    #[must_use]
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Enables or disables request validation.
    #[must_use]
    pub fn with_validate_request(mut self, validate_request: bool) -> Self {
        self.validate_request = validate_request;
        self
    }

    /// Enables or disables response validation.
    #[must_use]
    pub fn with_validate_response(mut self, validate_response: bool) -> Self {
        self.validate_response = validate_response;
        self
    }

    /// Returns raw responses instead of decoding them.
    #[must_use]
    pub fn with_return_response(mut self, return_response: bool) -> Self {
        self.return_response = return_response;
        self
    }

    /// Sets the message validator.
    #[must_use]
    pub fn with_validator(mut self, validator: impl MessageValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Sets the body codec, also used to encode request bodies.
    #[must_use]
    pub fn with_serializer(mut self, serializer: impl Serializer + 'static) -> Self {
        self.serializer = Some(Arc::new(serializer));
        self
    }

    /// Sets the HTTP client, required.
    #[must_use]
    pub fn with_client(mut self, client: impl HttpClient + 'static) -> Self {
        self.client = Some(Arc::new(client));
        self
    }

    /// Sets the schema provider, required.
    #[must_use]
    pub fn with_schema(mut self, schema: impl SchemaProvider + 'static) -> Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    /// Sets the pagination resolver used for collections.
    #[must_use]
    pub fn with_pagination(mut self, pagination: impl PaginationResolver + 'static) -> Self {
        self.pagination = Some(Arc::new(pagination));
        self
    }

    /// Sets the pagination from its configuration.
    ///
    /// # Errors
    ///
    /// Fails when the options do not match the selected strategy.
    pub fn with_pagination_config(mut self, config: &PaginationConfig) -> Result<Self, ApiServiceError> {
        self.pagination = Some(config.build()?);
        Ok(self)
    }
}
