//! Body codecs.
//!
//! A [`Serializer`] encodes request bodies and decodes response bodies into
//! domain values. Formats are short tokens derived from a content type with
//! [`extract_format`].

use std::fmt::Debug;

use crate::ApiServiceError;
use crate::definition::ResponseDefinition;
use crate::model::{ApiError, Resource};
use crate::pagination::PaginationResolver;
use crate::transport::{Request, Response};

mod default;
pub use self::default::DefaultSerializer;

/// Format of `application/x-www-form-urlencoded` bodies.
pub const FORM_FORMAT: &str = "x-www-form-urlencoded";

/// What a response body must be decoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum DecodeTarget {
    /// A [`Resource`], for successful responses.
    #[display("resource")]
    Resource,
    /// An [`ApiError`], for responses with a status of 400 or more.
    #[display("error")]
    Error,
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Decoded {
    /// Decoded with [`DecodeTarget::Resource`].
    Resource(Resource),
    /// Decoded with [`DecodeTarget::Error`].
    Error(ApiError),
}

/// Everything known about the exchange when decoding a response.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    /// The received response.
    pub response: &'a Response,
    /// The definition of the received status.
    pub response_definition: &'a ResponseDefinition,
    /// The sent request.
    pub request: &'a Request,
    /// The pagination resolver of the service, if any.
    pub pagination: Option<&'a dyn PaginationResolver>,
}

/// Body codec keyed by format.
pub trait Serializer: Debug + Send + Sync {
    /// Encodes a body.
    ///
    /// # Errors
    ///
    /// Fails on unsupported formats or values that cannot be encoded.
    fn serialize(&self, value: &serde_json::Value, format: &str) -> Result<String, SerializerError>;

    /// Decodes a response body into the requested target.
    ///
    /// # Errors
    ///
    /// Fails on unsupported formats, malformed bodies, or when the response
    /// definition does not allow building the target.
    fn deserialize(
        &self,
        body: &str,
        target: DecodeTarget,
        format: &str,
        context: &DecodeContext<'_>,
    ) -> Result<Decoded, ApiServiceError>;
}

/// Errors raised by a [`Serializer`].
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum SerializerError {
    /// The format has no codec.
    #[display("Unsupported format '{format}'")]
    #[from(skip)]
    UnsupportedFormat {
        /// The requested format.
        format: String,
    },

    /// JSON encoding or decoding error.
    JsonError(serde_json::Error),

    /// Form encoding error.
    FormError(serde_urlencoded::ser::Error),
}

/// Extracts the format token of a content type.
///
/// The structured syntax suffix wins over the subtype:
///
/// ```
/// # use apiservice_core::serializer::extract_format;
/// assert_eq!(extract_format("application/json"), "json");
/// assert_eq!(extract_format("application/hal+json; charset=utf-8"), "json");
/// assert_eq!(extract_format("application/x-www-form-urlencoded"), "x-www-form-urlencoded");
/// assert_eq!(extract_format("text/xml"), "xml");
/// ```
pub fn extract_format(content_type: &str) -> String {
    if let Ok(mime) = content_type.parse::<mime::Mime>() {
        let format = mime.suffix().unwrap_or_else(|| mime.subtype());
        return format.as_str().to_ascii_lowercase();
    }

    let essence = content_type.split(';').next().unwrap_or_default().trim();
    let subtype = essence.rsplit('/').next().unwrap_or(essence);
    subtype
        .rsplit('+')
        .next()
        .unwrap_or(subtype)
        .to_ascii_lowercase()
}
