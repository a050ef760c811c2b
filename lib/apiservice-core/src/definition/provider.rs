use std::fmt::Debug;
use std::sync::Arc;

use http::Method;

use super::OperationDefinition;

/// Identifies an operation, either by its `operationId` or by its route.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum OperationRef {
    /// Lookup by `operationId`.
    #[display("{_0}")]
    Id(String),
    /// Lookup by HTTP method and path template.
    #[display("{method} {path}")]
    Route {
        /// The HTTP method.
        method: Method,
        /// The path template, as declared in the schema (`/features/{id}`).
        path: String,
    },
}

impl OperationRef {
    /// Reference by `operationId`.
    pub fn id(operation_id: impl Into<String>) -> Self {
        Self::Id(operation_id.into())
    }

    /// Reference by method and path template.
    pub fn route(method: Method, path: impl Into<String>) -> Self {
        Self::Route {
            method,
            path: path.into(),
        }
    }

    fn matches(&self, definition: &OperationDefinition) -> bool {
        match self {
            Self::Id(id) => definition.operation_id() == Some(id.as_str()),
            Self::Route { method, path } => {
                definition.method() == method && definition.path_template() == path.as_str()
            }
        }
    }
}

impl From<&str> for OperationRef {
    fn from(value: &str) -> Self {
        Self::id(value)
    }
}

impl From<String> for OperationRef {
    fn from(value: String) -> Self {
        Self::Id(value)
    }
}

impl From<(Method, &str)> for OperationRef {
    fn from((method, path): (Method, &str)) -> Self {
        Self::route(method, path)
    }
}

/// Errors raised while resolving operations from a schema.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum SchemaError {
    /// No operation matches.
    #[display("Unable to find an operation matching {operation}")]
    #[from(skip)]
    OperationNotFound {
        /// The requested operation.
        operation: OperationRef,
    },

    /// More than one operation matches.
    #[display("{count} operations match {operation}")]
    #[from(skip)]
    AmbiguousOperation {
        /// The requested operation.
        operation: OperationRef,
        /// Number of matching operations.
        count: usize,
    },

    /// The schema document is not usable.
    #[display("Invalid schema: {message}")]
    #[from(skip)]
    InvalidSchema {
        /// What is wrong with the document.
        message: String,
    },

    /// The schema document is not valid JSON.
    JsonError(serde_json::Error),

    /// The schema document is not valid YAML.
    #[cfg(feature = "yaml")]
    YamlError(serde_saphyr::Error),
}

/// Source of operation definitions.
///
/// The provider is shared by every call of a service and must be reentrant.
pub trait SchemaProvider: Debug + Send + Sync {
    /// Resolves exactly one operation.
    ///
    /// # Errors
    ///
    /// Fails when no operation, or more than one, matches.
    fn operation_definition(
        &self,
        operation: &OperationRef,
    ) -> Result<Arc<OperationDefinition>, SchemaError>;
}

/// In-memory schema: a list of operation definitions.
///
/// Build it directly from definitions, or from an OpenAPI document with
/// [`ApiSchema::from_openapi`], [`ApiSchema::from_json_str`] or
/// `ApiSchema::from_yaml_str` (feature `yaml`).
#[derive(Debug, Clone, Default)]
pub struct ApiSchema {
    operations: Vec<Arc<OperationDefinition>>,
}

impl ApiSchema {
    /// Creates a schema from its operations.
    pub fn new(operations: impl IntoIterator<Item = OperationDefinition>) -> Self {
        let operations = operations.into_iter().map(Arc::new).collect();
        Self { operations }
    }

    /// All operations, in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.operations.iter().map(Arc::as_ref)
    }
}

impl SchemaProvider for ApiSchema {
    fn operation_definition(
        &self,
        operation: &OperationRef,
    ) -> Result<Arc<OperationDefinition>, SchemaError> {
        let mut found = self.operations.iter().filter(|it| operation.matches(it));
        let Some(first) = found.next() else {
            return Err(SchemaError::OperationNotFound {
                operation: operation.clone(),
            });
        };

        let others = found.count();
        if others > 0 {
            return Err(SchemaError::AmbiguousOperation {
                operation: operation.clone(),
                count: others + 1,
            });
        }

        Ok(Arc::clone(first))
    }
}
