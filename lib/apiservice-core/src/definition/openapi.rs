//! Builds an [`ApiSchema`] from an OpenAPI 3 or Swagger 2.0 document.
//!
//! The document is walked as raw JSON so both versions share the same code:
//! Swagger `body`/`formData` parameters map directly to their location, an
//! OpenAPI 3 `requestBody` becomes a `body` parameter (or `formData` for form
//! content types). Local `$ref`s are resolved for parameters, request bodies,
//! responses and top-level schemas.

use http::Method;
use serde_json::{Map, Value};
use tracing::debug;

use super::provider::{ApiSchema, SchemaError};
use super::{OperationDefinition, Parameter, ParameterLocation, Parameters, ResponseDefinition};

const OPERATION_KEYS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];
const FORM_CONTENT_TYPES: [&str; 2] = ["application/x-www-form-urlencoded", "multipart/form-data"];
const MAX_REF_DEPTH: usize = 16;

impl ApiSchema {
    /// Reads an OpenAPI 3 or Swagger 2.0 document.
    ///
    /// # Errors
    ///
    /// Fails when the document has no `paths` object or contains an
    /// unresolvable local reference.
    pub fn from_document(document: &Value) -> Result<Self, SchemaError> {
        DocumentReader { document }.read()
    }

    /// Reads a `utoipa` OpenAPI document.
    ///
    /// # Errors
    ///
    /// See [`ApiSchema::from_document`].
    pub fn from_openapi(openapi: &utoipa::openapi::OpenApi) -> Result<Self, SchemaError> {
        let document = serde_json::to_value(openapi)?;
        Self::from_document(&document)
    }

    /// Reads a JSON document.
    ///
    /// # Errors
    ///
    /// Fails on invalid JSON, see also [`ApiSchema::from_document`].
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let document = serde_json::from_str::<Value>(json)?;
        Self::from_document(&document)
    }

    /// Reads a YAML document.
    ///
    /// # Errors
    ///
    /// Fails on invalid YAML, see also [`ApiSchema::from_document`].
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        let document = serde_saphyr::from_str::<Value>(yaml)?;
        Self::from_document(&document)
    }
}

struct DocumentReader<'a> {
    document: &'a Value,
}

impl DocumentReader<'_> {
    fn read(&self) -> Result<ApiSchema, SchemaError> {
        let Some(paths) = self.document.get("paths").and_then(Value::as_object) else {
            return Err(SchemaError::InvalidSchema {
                message: "missing 'paths' object".to_string(),
            });
        };

        let mut operations = vec![];
        for (path, item) in paths {
            let item = self.resolve(item)?;
            let shared = item.get("parameters").and_then(Value::as_array);
            for key in OPERATION_KEYS {
                let Some(operation) = item.get(key) else {
                    continue;
                };
                let method = Method::from_bytes(key.to_ascii_uppercase().as_bytes()).map_err(|err| {
                    SchemaError::InvalidSchema {
                        message: err.to_string(),
                    }
                })?;
                operations.push(self.read_operation(method, path, shared, operation)?);
            }
        }

        Ok(ApiSchema::new(operations))
    }

    fn read_operation(
        &self,
        method: Method,
        path: &str,
        shared: Option<&Vec<Value>>,
        operation: &Value,
    ) -> Result<OperationDefinition, SchemaError> {
        let mut definition = OperationDefinition::new(method, path);
        if let Some(id) = operation.get("operationId").and_then(Value::as_str) {
            definition = definition.with_operation_id(id);
        }

        let mut parameters = Parameters::new();
        let declared = shared
            .into_iter()
            .flatten()
            .chain(operation.get("parameters").and_then(Value::as_array).into_iter().flatten());
        for parameter in declared {
            if let Some(parameter) = self.read_parameter(parameter)? {
                parameters = parameters.add(parameter);
            }
        }

        let mut consumes = self.strings(operation, "consumes");
        if let Some(body) = operation.get("requestBody") {
            let body = self.resolve(body)?;
            let content = body.get("content").and_then(Value::as_object);
            consumes = content.map(|it| it.keys().cloned().collect()).unwrap_or_default();

            if let Some((content_type, media)) = content.and_then(|it| it.iter().next()) {
                let location = if FORM_CONTENT_TYPES.contains(&content_type.as_str()) {
                    ParameterLocation::FormData
                } else {
                    ParameterLocation::Body
                };
                let schema = match media.get("schema") {
                    Some(schema) => self.resolve(schema)?,
                    None => Value::Null,
                };
                let required = body.get("required").and_then(Value::as_bool).unwrap_or(false);
                parameters = parameters.add(
                    Parameter::new("body", location)
                        .with_required(required)
                        .with_schema(schema),
                );
            }
        }
        definition = definition.with_parameters(parameters).with_consumes(consumes);

        let produces = self.strings(operation, "produces");
        let responses = operation.get("responses").and_then(Value::as_object);
        for (status, response) in responses.into_iter().flatten() {
            let response = self.read_response(&produces, response)?;
            if status == "default" {
                definition = definition.with_default_response(response);
            } else if let Ok(status) = status.parse::<u16>() {
                definition = definition.with_response(status, response);
            } else {
                debug!(%status, path, "skipping unsupported response status");
            }
        }

        Ok(definition)
    }

    fn read_parameter(&self, parameter: &Value) -> Result<Option<Parameter>, SchemaError> {
        let parameter = self.resolve(parameter)?;
        let name = parameter.get("name").and_then(Value::as_str).unwrap_or_default();
        let location = match parameter.get("in").and_then(Value::as_str) {
            Some("path") => ParameterLocation::Path,
            Some("query") => ParameterLocation::Query,
            Some("header") => ParameterLocation::Header,
            Some("body") => ParameterLocation::Body,
            Some("formData") => ParameterLocation::FormData,
            other => {
                debug!(name, location = ?other, "skipping parameter");
                return Ok(None);
            }
        };

        // Swagger 2 declares non-body types inline on the parameter itself
        let schema = match parameter.get("schema") {
            Some(schema) => self.resolve(schema)?,
            None => parameter.clone(),
        };
        let required = location == ParameterLocation::Path
            || parameter.get("required").and_then(Value::as_bool).unwrap_or(false);

        Ok(Some(
            Parameter::new(name, location)
                .with_required(required)
                .with_schema(schema),
        ))
    }

    fn read_response(
        &self,
        produces: &[String],
        response: &Value,
    ) -> Result<ResponseDefinition, SchemaError> {
        let response = self.resolve(response)?;
        let mut definition = ResponseDefinition::new();

        if let Some(content) = response.get("content").and_then(Value::as_object) {
            for (content_type, media) in content {
                if let Some(schema) = media.get("schema") {
                    definition = definition.with_body_schema(content_type, self.resolve(schema)?);
                }
            }
        } else if let Some(schema) = response.get("schema") {
            let schema = self.resolve(schema)?;
            for content_type in produces {
                definition = definition.with_body_schema(content_type, schema.clone());
            }
        }

        Ok(definition)
    }

    /// Operation-level list, falling back to the document-level one.
    fn strings(&self, operation: &Value, key: &str) -> Vec<String> {
        let values = operation
            .get(key)
            .or_else(|| self.document.get(key))
            .and_then(Value::as_array);
        let values = values
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect::<Vec<_>>();

        if values.is_empty() && key == "produces" {
            return vec![mime::APPLICATION_JSON.to_string()];
        }
        values
    }

    fn resolve(&self, value: &Value) -> Result<Value, SchemaError> {
        let mut current = value;
        for _ in 0..MAX_REF_DEPTH {
            let Some(reference) = reference(current) else {
                return Ok(current.clone());
            };
            let Some(pointer) = reference.strip_prefix('#') else {
                return Err(SchemaError::InvalidSchema {
                    message: format!("only local references are supported, got '{reference}'"),
                });
            };
            current = self
                .document
                .pointer(pointer)
                .ok_or_else(|| SchemaError::InvalidSchema {
                    message: format!("unresolvable reference '{reference}'"),
                })?;
        }

        Err(SchemaError::InvalidSchema {
            message: "too many nested references".to_string(),
        })
    }
}

fn reference(value: &Value) -> Option<&str> {
    value
        .as_object()
        .and_then(|it: &Map<String, Value>| it.get("$ref"))
        .and_then(Value::as_str)
}
