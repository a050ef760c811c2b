//! # apiservice-core
//!
//! Schema-driven HTTP API client.
//!
//! Given an OpenAPI (or Swagger 2.0) operation and the values of its
//! parameters, an [`ApiService`] builds the request, validates it, sends it,
//! validates the response and decodes its body into a domain value:
//! - a [`Resource`](model::Resource): an [`Item`](model::Item), or a
//!   [`Collection`](model::Collection) with its optional
//!   [`Pagination`](model::Pagination),
//! - an [`ApiError`](model::ApiError) for statuses of 400 or more,
//! - nothing, when the response has no body to decode,
//! - or the raw response, when the service is configured to return responses.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apiservice_core::pagination::HalPagination;
//! use apiservice_core::{ApiSchema, ApiService, CallParams, ReqwestClient};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = ApiSchema::from_json_str(include_str!("../tests/features.json"))?;
//! let service = ApiService::builder()
//!     .with_base_uri("https://api.example.org")
//!     .with_schema(schema)
//!     .with_client(ReqwestClient::new())
//!     .with_pagination(HalPagination::default())
//!     .build()?;
//!
//! // Body properties not given by the caller get their declared defaults
//! let created = service.call(
//!     "postFeature",
//!     CallParams::new().add_param("body", json!({"name": "dark-mode"})),
//! )?;
//!
//! let page = service.call("getFeatureCollection", CallParams::new().add_param("page", 2))?;
//! if let Some(collection) = page.as_resource().and_then(|it| it.as_collection()) {
//!     for feature in collection {
//!         println!("{feature}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Asynchronous calls
//!
//! [`ApiService::call_async`] requires a client with the asynchronous
//! capability, like [`AsyncReqwestClient`]. With [`ReqwestClient`] it fails
//! immediately with [`ApiServiceError::AsyncNotSupported`].
//!
//! ```rust,no_run
//! use apiservice_core::{ApiSchema, ApiService, AsyncReqwestClient, CallParams};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let schema = ApiSchema::default();
//! let service = ApiService::builder()
//!     .with_base_uri("https://api.example.org")
//!     .with_schema(schema)
//!     .with_client(AsyncReqwestClient::new())
//!     .build()?;
//!
//! let output = service
//!     .call_async("getFeature", CallParams::new().add_param("id", 1))?
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Collaborators
//!
//! The service relies on traits, with reference implementations:
//!
//! | Concern            | Trait                                      | Provided                                   |
//! |--------------------|--------------------------------------------|--------------------------------------------|
//! | Operations         | [`SchemaProvider`](definition::SchemaProvider) | [`ApiSchema`]                          |
//! | Validation         | [`MessageValidator`](validator::MessageValidator) | [`NoopValidator`](validator::NoopValidator) |
//! | Body codec         | [`Serializer`](serializer::Serializer)     | [`DefaultSerializer`](serializer::DefaultSerializer) |
//! | Transport          | [`HttpClient`](transport::HttpClient)      | [`ReqwestClient`], [`AsyncReqwestClient`]  |
//! | Pagination         | [`PaginationResolver`](pagination::PaginationResolver) | [`HeaderPagination`](pagination::HeaderPagination), [`HalPagination`](pagination::HalPagination) |
//! | Body transformation | [`DataTransformer`](transformer::DataTransformer) | [`HalDataTransformer`](transformer::HalDataTransformer) |
//!
//! ## Logging
//!
//! Each call reaching the network emits two `INFO` events through `tracing`,
//! one before sending the request and one after receiving the response.

pub mod definition;
pub mod denormalizer;
pub mod model;
pub mod pagination;
pub mod request;
pub mod serializer;
pub mod transformer;
pub mod transport;
pub mod validator;

mod error;
pub use self::error::ApiServiceError;

mod service;
pub use self::service::{ApiService, ApiServiceBuilder, ApiServiceConfig, CallFuture, CallOutput};

pub use self::definition::{ApiSchema, OperationRef};
pub use self::request::CallParams;
pub use self::transport::{AsyncReqwestClient, ReqwestClient};
