use http::StatusCode;

use crate::definition::SchemaError;
use crate::serializer::SerializerError;
use crate::transport::TransportError;
use crate::validator::ConstraintViolations;

/// Errors that can occur when calling an API through an [`ApiService`](crate::ApiService).
///
/// Callers usually need to distinguish four families:
/// - validation failures ([`RequestViolations`](Self::RequestViolations),
///   [`ResponseViolations`](Self::ResponseViolations)),
/// - transport failures ([`Transport`](Self::Transport),
///   [`AsyncNotSupported`](Self::AsyncNotSupported)),
/// - schema or configuration mismatches,
/// - request construction and decoding failures.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiServiceError {
    /// The outgoing request does not match the operation definition.
    ///
    /// Nothing was sent over the network.
    #[display("Request constraint violations:\n{_0}")]
    #[from(skip)]
    RequestViolations(ConstraintViolations),

    /// The received response does not match the operation definition.
    ///
    /// The response has been received, but it was not decoded.
    #[display("Response constraint violations:\n{_0}")]
    #[from(skip)]
    ResponseViolations(ConstraintViolations),

    /// An asynchronous call was requested but the HTTP client cannot send asynchronously.
    #[display("The configured HTTP client does not support asynchronous requests")]
    #[from(skip)]
    AsyncNotSupported,

    /// Failure reported by the HTTP client.
    Transport(TransportError),

    /// The operation could not be resolved from the schema.
    Schema(SchemaError),

    /// Body encoding or decoding failure.
    Serializer(SerializerError),

    /// The operation definition has no response for the received status code.
    #[display("No response definition for status {status}")]
    #[from(skip)]
    UnknownResponse {
        /// The received status code.
        status: StatusCode,
    },

    /// A resource was requested for a response without a body schema.
    #[display(
        "Cannot transform the response into a resource. You need to provide a schema for response {status} in {method} {path}"
    )]
    #[from(skip)]
    MissingBodySchema {
        /// The received status code.
        status: StatusCode,
        /// The request method.
        method: http::Method,
        /// The request path.
        path: String,
    },

    /// The response body schema has neither `x-type` nor `type`.
    #[display("Cannot extract type from schema")]
    #[from(skip)]
    SchemaTypeMissing,

    /// The base URI or the expanded path is not a valid URL.
    UrlError(url::ParseError),

    /// HTTP protocol error from the http crate.
    HttpError(http::Error),

    /// Invalid HTTP header name.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// Invalid HTTP header value.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// A parameter value cannot be written where its location requires.
    #[display("Unsupported {location} parameter value for '{name}': {value}")]
    #[from(skip)]
    UnsupportedParameterValue {
        /// The parameter location.
        location: &'static str,
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: serde_json::Value,
    },

    /// A mandatory piece of configuration is missing.
    #[display("Missing configuration: {field}")]
    #[from(skip)]
    MissingConfiguration {
        /// The missing configuration key.
        field: &'static str,
    },

    /// Pagination options do not match the selected factory.
    #[display(
        "Error while configuring pagination {factory}. Verify your configuration at 'pagination.options': {error}"
    )]
    #[from(skip)]
    InvalidPaginationOptions {
        /// The selected pagination factory.
        factory: String,
        /// The deserialization error, including the offending path.
        error: serde_path_to_error::Error<serde_json::Error>,
    },
}
