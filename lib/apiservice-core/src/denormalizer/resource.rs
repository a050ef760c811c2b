use std::borrow::Cow;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::ApiServiceError;
use crate::model::{Collection, Item, Meta, Resource};
use crate::serializer::DecodeContext;
use crate::transformer::DataTransformerChain;
use crate::transport::content_type;

/// Builds an [`Item`] or a [`Collection`] depending on the shape of the response body schema.
///
/// The shape is read from `x-type`, then `type`. Collections get their
/// pagination from the raw payload, before the transformers run.
#[derive(Debug, Default)]
pub struct ResourceDenormalizer {
    transformers: DataTransformerChain,
}

impl ResourceDenormalizer {
    /// Creates a denormalizer transforming payloads with the chain.
    pub fn new(transformers: DataTransformerChain) -> Self {
        Self { transformers }
    }

    /// # Errors
    ///
    /// Fails when the response definition has no body schema, or when the
    /// selected schema has no type.
    pub fn denormalize(
        &self,
        data: Value,
        context: &DecodeContext<'_>,
    ) -> Result<Resource, ApiServiceError> {
        let DecodeContext {
            response,
            response_definition,
            request,
            pagination,
        } = *context;

        if !response_definition.has_body_schema() {
            return Err(ApiServiceError::MissingBodySchema {
                status: response.status(),
                method: request.method().clone(),
                path: request.uri().path().to_string(),
            });
        }

        let content_type = content_type(response.headers());
        let schema = body_schema(response_definition.body_schemas(), content_type);
        let shape = schema_type(&schema).ok_or(ApiServiceError::SchemaTypeMissing)?;
        let meta = Meta::new(response.headers().clone());

        if shape != "array" {
            let data = self.transformers.transform(content_type, data);
            return Ok(Item::new(data, meta).into());
        }

        let pagination = pagination
            .filter(|resolver| resolver.supports(response))
            .map(|resolver| resolver.extract(&data, response));
        let data = self.transformers.transform(content_type, data);

        let mut collection = Collection::new(data, meta);
        if let Some(pagination) = pagination {
            collection = collection.with_pagination(pagination);
        }
        Ok(collection.into())
    }
}

fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn body_schema<'a>(schemas: &'a IndexMap<String, Value>, content_type: &str) -> Cow<'a, Value> {
    let actual = essence(content_type);
    let found = schemas.iter().find(|(declared, _)| {
        let declared = essence(declared);
        !declared.is_empty() && actual.starts_with(&declared)
    });

    match found {
        Some((_, schema)) => Cow::Borrowed(schema),
        None if schemas.len() == 1 => {
            debug!(content_type, "no body schema for the content type, using the only declared one");
            schemas.values().next().map_or(Cow::Owned(Value::Null), Cow::Borrowed)
        }
        None => Cow::Owned(Value::Object(
            schemas.iter().map(|(key, value)| (key.clone(), value.clone())).collect(),
        )),
    }
}

fn schema_type(schema: &Value) -> Option<&str> {
    let shape = schema.get("x-type").or_else(|| schema.get("type"))?;
    match shape {
        Value::String(shape) => Some(shape),
        Value::Array(shapes) => shapes
            .iter()
            .filter_map(Value::as_str)
            .find(|shape| *shape != "null"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use http::Method;
    use serde_json::json;

    use super::*;
    use crate::definition::ResponseDefinition;
    use crate::pagination::HalPagination;
    use crate::transformer::HalDataTransformer;
    use crate::transport::{Request, Response};

    fn request() -> Request {
        http::Request::builder()
            .method(Method::GET)
            .uri("http://api.example.org/features?page=2")
            .body(String::new())
            .expect("valid request")
    }

    fn response(content_type: &str) -> Response {
        http::Response::builder()
            .header("content-type", content_type)
            .header("x-request-id", "42")
            .body(String::new())
            .expect("valid response")
    }

    fn denormalizer() -> ResourceDenormalizer {
        ResourceDenormalizer::new(DataTransformerChain::new().with_transformer(HalDataTransformer))
    }

    #[test]
    fn test_item() {
        let (request, response) = (request(), response("application/json; charset=utf-8"));
        let definition = ResponseDefinition::new()
            .with_body_schema("application/xml", json!({"type": "array"}))
            .with_body_schema("application/json", json!({"type": "object"}));
        let context = DecodeContext {
            response: &response,
            response_definition: &definition,
            request: &request,
            pagination: None,
        };

        let resource = denormalizer()
            .denormalize(json!({"id": 1}), &context)
            .expect("valid resource");

        let item = resource.as_item().expect("an item");
        assert_eq!(item.data(), &json!({"id": 1}));
        assert_eq!(item.meta().header("x-request-id"), Some("42"));
    }

    #[test]
    fn test_paginated_hal_collection() {
        let (request, response) = (request(), response("application/hal+json"));
        let definition = ResponseDefinition::new()
            .with_body_schema("application/hal+json", json!({"type": "object", "x-type": "array"}));
        let pagination = HalPagination::default();
        let context = DecodeContext {
            response: &response,
            response_definition: &definition,
            request: &request,
            pagination: Some(&pagination),
        };
        let data = json!({
            "totalItems": 52,
            "itemsPerPage": 3,
            "_links": {
                "self": {"href": "/features?itemsPerPage=3&page=2"},
                "next": {"href": "/features?itemsPerPage=3&page=3"}
            },
            "_embedded": {"item": [
                {"_links": {"self": {"href": "/features/4"}}, "id": 4},
                {"_links": {"self": {"href": "/features/5"}}, "id": 5},
                {"_links": {"self": {"href": "/features/6"}}, "id": 6}
            ]}
        });

        let resource = denormalizer().denormalize(data, &context).expect("valid resource");

        let collection = resource.as_collection().expect("a collection");
        assert_eq!(collection.data(), [json!({"id": 4}), json!({"id": 5}), json!({"id": 6})]);
        let pagination = collection.pagination().expect("paginated");
        assert_eq!(
            (pagination.page(), pagination.per_page(), pagination.total_items()),
            (2, 3, 52)
        );
        let links = pagination.links().expect("links");
        assert_eq!(links.next(), Some("/features?itemsPerPage=3&page=3"));
        assert!(links.has_next());
    }

    #[test]
    fn test_collection_without_supported_pagination() {
        let (request, response) = (request(), response("application/json"));
        let definition =
            ResponseDefinition::new().with_body_schema("application/json", json!({"type": "array"}));
        let pagination = HalPagination::default();
        let context = DecodeContext {
            response: &response,
            response_definition: &definition,
            request: &request,
            pagination: Some(&pagination),
        };

        let resource = denormalizer()
            .denormalize(json!([{"id": 1}]), &context)
            .expect("valid resource");

        let collection = resource.as_collection().expect("a collection");
        assert!(!collection.has_pagination());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_single_schema_fallback() {
        let (request, response) = (request(), response("text/plain"));
        let definition =
            ResponseDefinition::new().with_body_schema("application/json", json!({"type": "array"}));
        let context = DecodeContext {
            response: &response,
            response_definition: &definition,
            request: &request,
            pagination: None,
        };

        let resource = denormalizer()
            .denormalize(json!([1, 2]), &context)
            .expect("valid resource");

        assert!(resource.as_collection().is_some());
    }

    #[test]
    fn test_missing_body_schema() {
        let (request, response) = (request(), response("application/json"));
        let definition = ResponseDefinition::new();
        let context = DecodeContext {
            response: &response,
            response_definition: &definition,
            request: &request,
            pagination: None,
        };

        let error = denormalizer()
            .denormalize(json!({}), &context)
            .expect_err("should fail");

        insta::assert_snapshot!(error, @"Cannot transform the response into a resource. You need to provide a schema for response 200 OK in GET /features");
    }

    #[test]
    fn test_missing_schema_type() {
        let (request, response) = (request(), response("text/plain"));
        let definition = ResponseDefinition::new()
            .with_body_schema("application/json", json!({"type": "object"}))
            .with_body_schema("application/xml", json!({"type": "object"}));
        let context = DecodeContext {
            response: &response,
            response_definition: &definition,
            request: &request,
            pagination: None,
        };

        let error = denormalizer()
            .denormalize(json!({}), &context)
            .expect_err("should fail");

        assert!(matches!(error, ApiServiceError::SchemaTypeMissing));
    }
}
