//! Operation definitions consumed by the service.
//!
//! These types are the read-only view of an API schema: one [`OperationDefinition`]
//! per `(method, path)` endpoint, with its declared [`Parameters`] and its
//! [`ResponseDefinition`]s. They are usually produced by a [`SchemaProvider`].

use http::Method;
use indexmap::IndexMap;
use serde_json::Value;

mod openapi;

mod provider;
pub use self::provider::{ApiSchema, OperationRef, SchemaError, SchemaProvider};

/// Where a parameter goes in the built request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    /// Substituted into the path template.
    #[display("path")]
    Path,
    /// Added to the query string.
    #[display("query")]
    Query,
    /// Sent as a request header.
    #[display("header")]
    Header,
    /// Serialized as the request body.
    #[display("body")]
    Body,
    /// Encoded as a form body.
    #[display("formData")]
    FormData,
}

/// A declared operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    location: ParameterLocation,
    required: bool,
    schema: Value,
}

impl Parameter {
    /// Creates an optional parameter without schema.
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            required: false,
            schema: Value::Null,
        }
    }

    /// Sets the required flag.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the JSON schema fragment of this parameter.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the parameter goes.
    pub fn location(&self) -> ParameterLocation {
        self.location
    }

    /// Whether the caller must provide a value.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The JSON schema fragment, `null` when undeclared.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The schema `default`, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.schema.get("default")
    }
}

/// Declared parameters of an operation, unique by name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    parameters: IndexMap<String, Parameter>,
}

impl Parameters {
    /// No parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous parameter with the same name.
    pub fn add(mut self, parameter: Parameter) -> Self {
        self.parameters.insert(parameter.name.clone(), parameter);
        self
    }

    /// Looks up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    /// Parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether no parameter is declared.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl FromIterator<Parameter> for Parameters {
    fn from_iter<T: IntoIterator<Item = Parameter>>(iter: T) -> Self {
        iter.into_iter().fold(Self::new(), Self::add)
    }
}

/// Expected response for a status code.
///
/// Body schemas are keyed by content type (`application/json`, `application/hal+json`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseDefinition {
    body_schemas: IndexMap<String, Value>,
}

impl ResponseDefinition {
    /// A response without body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the body schema for a content type.
    pub fn with_body_schema(mut self, content_type: impl Into<String>, schema: Value) -> Self {
        self.body_schemas.insert(content_type.into(), schema);
        self
    }

    /// Whether at least one body schema is declared.
    pub fn has_body_schema(&self) -> bool {
        !self.body_schemas.is_empty()
    }

    /// Body schemas by content type.
    pub fn body_schemas(&self) -> &IndexMap<String, Value> {
        &self.body_schemas
    }
}

/// A single endpoint of the API.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDefinition {
    operation_id: Option<String>,
    method: Method,
    path_template: String,
    parameters: Parameters,
    consumes: Vec<String>,
    responses: IndexMap<u16, ResponseDefinition>,
    default_response: Option<ResponseDefinition>,
}

impl OperationDefinition {
    /// Creates an operation without parameters nor responses.
    pub fn new(method: Method, path_template: impl Into<String>) -> Self {
        Self {
            operation_id: None,
            method,
            path_template: path_template.into(),
            parameters: Parameters::default(),
            consumes: Vec::new(),
            responses: IndexMap::new(),
            default_response: None,
        }
    }

    /// Sets the `operationId`.
    pub fn with_operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Replaces all parameters.
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Adds a parameter, replacing any parameter with the same name.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters = self.parameters.add(parameter);
        self
    }

    /// Declares the request content types, in order of preference.
    pub fn with_consumes<I, T>(mut self, content_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.consumes = content_types.into_iter().map(Into::into).collect();
        self
    }

    /// Declares the response of a status code.
    pub fn with_response(mut self, status: u16, response: ResponseDefinition) -> Self {
        self.responses.insert(status, response);
        self
    }

    /// Declares the response used for undeclared status codes.
    pub fn with_default_response(mut self, response: ResponseDefinition) -> Self {
        self.default_response = Some(response);
        self
    }

    /// The `operationId`, if declared.
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path template, like `/features/{id}`.
    pub fn path_template(&self) -> &str {
        &self.path_template
    }

    /// The declared parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// The declared request content types.
    pub fn consumes(&self) -> &[String] {
        &self.consumes
    }

    /// Looks up the response definition of a status code, falling back to the default response.
    pub fn response_definition(&self, status: u16) -> Option<&ResponseDefinition> {
        self.responses
            .get(&status)
            .or(self.default_response.as_ref())
    }
}
