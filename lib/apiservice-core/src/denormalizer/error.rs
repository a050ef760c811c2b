use serde_json::Value;
use tracing::debug;

use crate::model::{ApiError, ErrorViolation};
use crate::serializer::DecodeContext;

/// Builds an [`ApiError`] from the response status and the `violations` of the payload.
///
/// Violations are read leniently, the status is never lost:
/// - entries shaped like [`ErrorViolation`] are kept as is,
/// - other entries become a violation without property path, their raw JSON as message,
/// - a `violations` object maps each key to a violation on that property.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorDenormalizer;

impl ErrorDenormalizer {
    /// Builds the error of the response in the context.
    pub fn denormalize(&self, data: &Value, context: &DecodeContext<'_>) -> ApiError {
        let violations = match data.get("violations") {
            None | Some(Value::Null) => vec![],
            Some(Value::Array(entries)) => entries.iter().map(violation).collect(),
            Some(Value::Object(fields)) => fields
                .iter()
                .map(|(property, message)| ErrorViolation::new(property.as_str(), text(message)))
                .collect(),
            Some(other) => vec![ErrorViolation::new("", text(other))],
        };

        ApiError::new(context.response.status(), violations)
    }
}

fn violation(entry: &Value) -> ErrorViolation {
    serde_path_to_error::deserialize::<_, ErrorViolation>(entry).unwrap_or_else(|error| {
        debug!(%error, "keeping unrecognized violation as raw message");
        ErrorViolation::new("", text(entry))
    })
}

fn text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
