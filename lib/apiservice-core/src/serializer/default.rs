use serde_json::Value;

use super::{DecodeContext, DecodeTarget, Decoded, FORM_FORMAT, Serializer, SerializerError};
use crate::ApiServiceError;
use crate::denormalizer::{ErrorDenormalizer, ResourceDenormalizer};
use crate::transformer::{DataTransformerChain, HalDataTransformer};

/// JSON codec, with form encoding for request bodies.
///
/// Decoded payloads are handed to the [`ResourceDenormalizer`] or the
/// [`ErrorDenormalizer`] depending on the target. The default resource
/// denormalizer flattens HAL documents.
#[derive(Debug)]
pub struct DefaultSerializer {
    resource: ResourceDenormalizer,
    error: ErrorDenormalizer,
}

impl Default for DefaultSerializer {
    fn default() -> Self {
        let transformers = DataTransformerChain::new().with_transformer(HalDataTransformer);
        Self::new(ResourceDenormalizer::new(transformers))
    }
}

impl DefaultSerializer {
    /// Creates a serializer with a custom resource denormalizer.
    pub fn new(resource: ResourceDenormalizer) -> Self {
        Self {
            resource,
            error: ErrorDenormalizer,
        }
    }
}

impl Serializer for DefaultSerializer {
    fn serialize(&self, value: &Value, format: &str) -> Result<String, SerializerError> {
        match format {
            "json" => Ok(serde_json::to_string(value)?),
            FORM_FORMAT => Ok(serde_urlencoded::to_string(value)?),
            _ => Err(SerializerError::UnsupportedFormat {
                format: format.to_string(),
            }),
        }
    }

    fn deserialize(
        &self,
        body: &str,
        target: DecodeTarget,
        format: &str,
        context: &DecodeContext<'_>,
    ) -> Result<Decoded, ApiServiceError> {
        if format != "json" {
            return Err(SerializerError::UnsupportedFormat {
                format: format.to_string(),
            }
            .into());
        }

        let data = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(body).map_err(SerializerError::from)?
        };

        let decoded = match target {
            DecodeTarget::Resource => Decoded::Resource(self.resource.denormalize(data, context)?),
            DecodeTarget::Error => Decoded::Error(self.error.denormalize(&data, context)),
        };
        Ok(decoded)
    }
}
