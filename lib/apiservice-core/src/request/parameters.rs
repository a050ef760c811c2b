use http::Method;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use super::CallParams;
use crate::definition::{OperationDefinition, Parameter, ParameterLocation};

/// Parameter values sorted by location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedParameters {
    /// Path template variables.
    pub path: IndexMap<String, Value>,
    /// Query string entries.
    pub query: IndexMap<String, Value>,
    /// Request headers.
    pub header: IndexMap<String, Value>,
    /// Request body, before encoding.
    pub body: Option<Value>,
    /// Form fields, before encoding.
    pub form_data: Map<String, Value>,
}

impl ResolvedParameters {
    /// Collects the non-empty `default`s of the declared parameters.
    ///
    /// Body parameters contribute the defaults of their schema properties.
    /// Nothing is collected for `PATCH` operations.
    pub fn resolve_defaults(definition: &OperationDefinition) -> Self {
        let mut result = Self::default();
        if definition.method() == Method::PATCH {
            return result;
        }

        for parameter in definition.parameters().iter() {
            match parameter.location() {
                ParameterLocation::Body => {
                    let defaults = property_defaults(parameter);
                    if !defaults.is_empty() {
                        result.body = Some(Value::Object(defaults));
                    }
                }
                ParameterLocation::FormData if has_properties(parameter) => {
                    result.form_data.extend(property_defaults(parameter));
                }
                location => {
                    let Some(default) = parameter.default_value().filter(|it| !is_empty(it)) else {
                        continue;
                    };
                    result.insert(location, parameter.name(), default.clone());
                }
            }
        }

        result
    }

    /// Applies the caller values on top of these parameters.
    ///
    /// Names that are not declared by the operation are dropped. Object values
    /// of body and form parameters are merged key by key, the caller wins.
    #[must_use]
    pub fn merge(mut self, definition: &OperationDefinition, params: &CallParams) -> Self {
        for (name, value) in params.iter() {
            let Some(parameter) = definition.parameters().get(name) else {
                debug!(name, "ignoring undeclared parameter");
                continue;
            };
            self.insert(parameter.location(), name, value.clone());
        }
        self
    }

    fn insert(&mut self, location: ParameterLocation, name: &str, value: Value) {
        match location {
            ParameterLocation::Path => {
                self.path.insert(name.to_string(), value);
            }
            ParameterLocation::Query => {
                self.query.insert(name.to_string(), value);
            }
            ParameterLocation::Header => {
                self.header.insert(name.to_string(), value);
            }
            ParameterLocation::Body => {
                self.body = Some(match (self.body.take(), value) {
                    (Some(Value::Object(mut body)), Value::Object(fields)) => {
                        body.extend(fields);
                        Value::Object(body)
                    }
                    (_, value) => value,
                });
            }
            ParameterLocation::FormData => match value {
                Value::Object(fields) => self.form_data.extend(fields),
                value => {
                    self.form_data.insert(name.to_string(), value);
                }
            },
        }
    }

    /// The `content-type` header, whatever its case.
    pub fn content_type(&self) -> Option<&str> {
        self.header
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(http::header::CONTENT_TYPE.as_str()))
            .and_then(|(_, value)| value.as_str())
    }
}

/// `null`, `false`, `0`, `""`, `"0"`, `[]` and `{}` are empty.
pub(crate) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().is_some_and(|it| it.abs() < f64::EPSILON),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(values) => values.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn has_properties(parameter: &Parameter) -> bool {
    parameter.schema().get("properties").is_some_and(Value::is_object)
}

fn property_defaults(parameter: &Parameter) -> Map<String, Value> {
    let properties = parameter.schema().get("properties").and_then(Value::as_object);
    properties
        .into_iter()
        .flatten()
        .filter_map(|(name, schema)| {
            let default = schema.get("default").filter(|it| !is_empty(it))?;
            Some((name.clone(), default.clone()))
        })
        .collect()
}
