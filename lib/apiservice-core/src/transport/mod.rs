//! HTTP client abstraction.
//!
//! The service only needs to send a fully built [`Request`] and get a [`Response`]
//! back. Synchronous sending is mandatory, asynchronous sending is an optional
//! capability exposed through [`HttpClient::as_async`].

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

mod reqwest_client;
pub use self::reqwest_client::{AsyncReqwestClient, ReqwestClient};

/// Request produced by the request factory.
pub type Request = http::Request<String>;

/// Response handed back by an [`HttpClient`].
pub type Response = http::Response<String>;

/// Pending response of an asynchronous send.
pub type ResponseFuture = Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send>>;

/// Blocking HTTP transport.
pub trait HttpClient: Debug + Send + Sync {
    /// Sends the request and waits for the response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network or protocol failure.
    fn send(&self, request: Request) -> Result<Response, TransportError>;

    /// Returns the asynchronous capability of this client, if any.
    fn as_async(&self) -> Option<&dyn AsyncHttpClient> {
        None
    }
}

/// Non-blocking HTTP transport.
pub trait AsyncHttpClient: Debug + Send + Sync {
    /// Starts sending the request, the returned future resolves with the response.
    fn send_async(&self, request: Request) -> ResponseFuture;
}

/// Errors raised by an [`HttpClient`].
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum TransportError {
    /// HTTP client error from the underlying reqwest library.
    ReqwestError(reqwest::Error),

    /// I/O error, for example while starting a runtime.
    IoError(std::io::Error),

    /// The response could not be rebuilt.
    HttpError(http::Error),

    /// Any other transport failure.
    #[display("Transport failure: {message}")]
    #[from(skip)]
    Other {
        /// Description of the failure.
        message: String,
    },
}

/// Returns the `Content-Type` header of a message, or an empty string.
pub(crate) fn content_type(headers: &http::HeaderMap) -> &str {
    headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Copies a request, `http::Request` is not `Clone` because of its extensions.
pub(crate) fn duplicate(request: &Request) -> Request {
    let mut copy = http::Request::new(request.body().clone());
    *copy.method_mut() = request.method().clone();
    *copy.uri_mut() = request.uri().clone();
    *copy.version_mut() = request.version();
    *copy.headers_mut() = request.headers().clone();
    copy
}
