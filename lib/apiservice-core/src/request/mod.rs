//! Building HTTP requests from operation definitions.
//!
//! Declared parameter defaults are collected, caller values are merged on top
//! of them, then each location is written into the request: the path template
//! is expanded, the query string built, headers attached and the body encoded.

use std::sync::Arc;

use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use indexmap::IndexMap;
use serde_json::Value;
use url::Url;

use crate::ApiServiceError;
use crate::definition::OperationDefinition;
use crate::serializer::{FORM_FORMAT, Serializer, extract_format};
use crate::transport::Request;

mod parameters;
pub use self::parameters::ResolvedParameters;

mod path;
mod query;

use self::parameters::is_empty;
use self::path::expand_template;
use self::query::{build_query, header_value};

/// Caller values of a call, by parameter name.
///
/// Body and form parameters usually take an object, merged over the declared
/// property defaults.
///
/// ```
/// # use apiservice_core::CallParams;
/// # use serde_json::json;
/// let params = CallParams::new()
///     .add_param("id", 42)
///     .add_param("body", json!({"name": "foo"}));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallParams(IndexMap<String, Value>);

impl CallParams {
    /// No values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a value.
    #[must_use]
    pub fn add_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// The value of a parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Whether no value is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<serde_json::Map<String, Value>> for CallParams {
    fn from(value: serde_json::Map<String, Value>) -> Self {
        value.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for CallParams
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// Creates requests from operation definitions.
#[derive(Debug, Clone)]
pub struct RequestFactory {
    serializer: Arc<dyn Serializer>,
}

impl RequestFactory {
    /// Creates a factory encoding bodies with the serializer.
    pub fn new(serializer: Arc<dyn Serializer>) -> Self {
        Self { serializer }
    }

    /// Builds the request of an operation.
    ///
    /// The body is encoded with the format of the `content-type` header. When
    /// that header is absent, the first declared request content type is used,
    /// then `application/json`, and the header is added. Form fields are
    /// url-encoded and replace the body.
    ///
    /// # Errors
    ///
    /// Fails on invalid base URI, header or parameter values, or when the body
    /// cannot be encoded.
    pub fn create_request_from_definition(
        &self,
        definition: &OperationDefinition,
        base_uri: &str,
        params: &CallParams,
    ) -> Result<Request, ApiServiceError> {
        let mut parameters =
            ResolvedParameters::resolve_defaults(definition).merge(definition, params);

        let mut body = None;
        if let Some(value) = parameters.body.as_ref().filter(|it| !is_empty(it)) {
            let content_type = parameters
                .content_type()
                .or_else(|| definition.consumes().first().map(String::as_str))
                .unwrap_or(mime::APPLICATION_JSON.as_ref())
                .to_string();
            body = Some(self.serializer.serialize(value, &extract_format(&content_type))?);
            set_default_content_type(&mut parameters, content_type);
        }

        let fields = std::mem::take(&mut parameters.form_data)
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .collect::<serde_json::Map<_, _>>();
        if !fields.is_empty() {
            body = Some(self.serializer.serialize(&Value::Object(fields), FORM_FORMAT)?);
            set_default_content_type(
                &mut parameters,
                mime::APPLICATION_WWW_FORM_URLENCODED.to_string(),
            );
        }

        build_request(
            base_uri,
            definition.method(),
            definition.path_template(),
            &parameters,
            body,
        )
    }
}

fn set_default_content_type(parameters: &mut ResolvedParameters, content_type: String) {
    if parameters.content_type().is_none() {
        parameters
            .header
            .insert(CONTENT_TYPE.to_string(), Value::String(content_type));
    }
}

/// Writes the resolved parameters into a request.
///
/// The path and the query of the base URI are replaced.
///
/// # Errors
///
/// Fails on invalid base URI, header or parameter values.
pub fn build_request(
    base_uri: &str,
    method: &http::Method,
    path_template: &str,
    parameters: &ResolvedParameters,
    body: Option<String>,
) -> Result<Request, ApiServiceError> {
    let mut url = Url::parse(base_uri)?;
    url.set_path(&expand_template(path_template, &parameters.path));
    url.set_query(build_query(&parameters.query).as_deref());

    let mut request = http::Request::builder()
        .method(method.clone())
        .uri(url.as_str())
        .body(body.unwrap_or_default())?;

    for (name, value) in &parameters.header {
        let Some(value) = header_value(name, value)? else {
            continue;
        };
        request.headers_mut().insert(
            HeaderName::try_from(name.as_str())?,
            HeaderValue::try_from(value)?,
        );
    }

    Ok(request)
}
