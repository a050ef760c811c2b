//! Content-type driven transformations of decoded payloads.

use std::fmt::Debug;

use serde_json::Value;

mod hal;
pub use self::hal::HalDataTransformer;

/// Structural transformation applied to a decoded payload before it is wrapped in a resource.
pub trait DataTransformer: Debug + Send + Sync {
    /// Whether this transformer handles the content type.
    fn supports(&self, content_type: &str) -> bool;

    fn transform(&self, data: Value) -> Value;
}

/// Ordered list of transformers, the first supporting one wins.
///
/// When no transformer supports the content type, the data is returned unchanged.
#[derive(Debug, Default)]
pub struct DataTransformerChain {
    transformers: Vec<Box<dyn DataTransformer>>,
}

impl DataTransformerChain {
    /// An empty chain, transforming nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transformer, earlier transformers take precedence.
    pub fn with_transformer(mut self, transformer: impl DataTransformer + 'static) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    /// Transforms the data with the first transformer supporting the content type.
    pub fn transform(&self, content_type: &str, data: Value) -> Value {
        match self.transformers.iter().find(|it| it.supports(content_type)) {
            Some(transformer) => transformer.transform(data),
            None => data,
        }
    }
}
