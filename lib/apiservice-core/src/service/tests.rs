use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use http::{Method, StatusCode};
use serde_json::{Value, json};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use super::*;
use crate::definition::{
    OperationDefinition, OperationRef, Parameter, ParameterLocation, ResponseDefinition,
    SchemaError,
};
use crate::pagination::HalPagination;
use crate::request::CallParams;
use crate::serializer::{DecodeContext, DecodeTarget, Decoded, DefaultSerializer, SerializerError};
use crate::transport::{AsyncHttpClient, Request, Response, ResponseFuture, TransportError};
use crate::validator::ConstraintViolation;

#[derive(Debug, Clone, Default)]
struct Counters {
    lookups: Arc<AtomicUsize>,
    request_validations: Arc<AtomicUsize>,
    response_validations: Arc<AtomicUsize>,
    sends: Arc<AtomicUsize>,
    targets: Arc<Mutex<Vec<DecodeTarget>>>,
}

impl Counters {
    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn validations(&self) -> usize {
        self.request_validations.load(Ordering::SeqCst)
            + self.response_validations.load(Ordering::SeqCst)
    }

    fn sends(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }

    fn targets(&self) -> Vec<DecodeTarget> {
        self.targets.lock().expect("not poisoned").clone()
    }
}

#[derive(Debug)]
struct MockSchema {
    definitions: Vec<Arc<OperationDefinition>>,
    counters: Counters,
}

impl SchemaProvider for MockSchema {
    fn operation_definition(
        &self,
        operation: &OperationRef,
    ) -> Result<Arc<OperationDefinition>, SchemaError> {
        self.counters.lookups.fetch_add(1, Ordering::SeqCst);
        let found = self.definitions.iter().find(|it| match operation {
            OperationRef::Id(id) => it.operation_id() == Some(id.as_str()),
            OperationRef::Route { method, path } => it.method() == method && it.path_template() == path.as_str(),
        });
        found.cloned().ok_or_else(|| SchemaError::OperationNotFound {
            operation: operation.clone(),
        })
    }
}

#[derive(Debug, Default)]
struct MockValidator {
    request: Vec<ConstraintViolation>,
    response: Vec<ConstraintViolation>,
    counters: Counters,
}

impl MessageValidator for MockValidator {
    fn validate_request(
        &self,
        _request: &Request,
        _definition: &OperationDefinition,
    ) -> Vec<ConstraintViolation> {
        self.counters.request_validations.fetch_add(1, Ordering::SeqCst);
        self.request.clone()
    }

    fn validate_response(
        &self,
        _response: &Response,
        _definition: &OperationDefinition,
    ) -> Vec<ConstraintViolation> {
        self.counters.response_validations.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

#[derive(Debug)]
struct MockClient {
    status: StatusCode,
    content_type: &'static str,
    body: String,
    async_capable: bool,
    counters: Counters,
}

impl MockClient {
    fn respond(&self, request: &Request) -> Result<Response, TransportError> {
        self.counters.sends.fetch_add(1, Ordering::SeqCst);
        assert_eq!(request.uri().host(), Some("api.example.org"));

        let response = http::Response::builder()
            .status(self.status)
            .header("content-type", self.content_type)
            .body(self.body.clone())?;
        Ok(response)
    }
}

impl HttpClient for MockClient {
    fn send(&self, request: Request) -> Result<Response, TransportError> {
        self.respond(&request)
    }

    fn as_async(&self) -> Option<&dyn AsyncHttpClient> {
        if self.async_capable { Some(self) } else { None }
    }
}

impl AsyncHttpClient for MockClient {
    fn send_async(&self, request: Request) -> ResponseFuture {
        Box::pin(std::future::ready(self.respond(&request)))
    }
}

#[derive(Debug)]
struct RecordingSerializer {
    inner: DefaultSerializer,
    counters: Counters,
}

impl Serializer for RecordingSerializer {
    fn serialize(&self, value: &Value, format: &str) -> Result<String, SerializerError> {
        self.inner.serialize(value, format)
    }

    fn deserialize(
        &self,
        body: &str,
        target: DecodeTarget,
        format: &str,
        context: &DecodeContext<'_>,
    ) -> Result<Decoded, ApiServiceError> {
        self.counters
            .targets
            .lock()
            .expect("not poisoned")
            .push(target);
        self.inner.deserialize(body, target, format, context)
    }
}

/// Counts the INFO events emitted by this crate.
#[derive(Debug, Clone, Default)]
struct InfoEvents(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for InfoEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() == Level::INFO && metadata.target().starts_with("apiservice_core") {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn with_info_events<T>(call: impl FnOnce() -> T) -> (T, usize) {
    let events = InfoEvents::default();
    let subscriber = tracing_subscriber::registry().with(events.clone());
    let result = tracing::subscriber::with_default(subscriber, call);
    (result, events.0.load(Ordering::SeqCst))
}

fn json_schema(kind: &str) -> ResponseDefinition {
    ResponseDefinition::new().with_body_schema("application/json", json!({"type": kind}))
}

fn definitions() -> Vec<Arc<OperationDefinition>> {
    let get_feature = OperationDefinition::new(Method::GET, "/features/{id}")
        .with_operation_id("getFeature")
        .with_parameter(Parameter::new("id", ParameterLocation::Path).with_required(true))
        .with_response(200, json_schema("object"))
        .with_response(204, json_schema("object"))
        .with_response(400, json_schema("object"));

    let get_collection = OperationDefinition::new(Method::GET, "/features")
        .with_operation_id("getFeatureCollection")
        .with_parameter(
            Parameter::new("page", ParameterLocation::Query).with_schema(json!({"default": 1})),
        )
        .with_response(
            200,
            ResponseDefinition::new().with_body_schema(
                "application/hal+json",
                json!({"type": "object", "x-type": "array"}),
            ),
        );

    vec![Arc::new(get_feature), Arc::new(get_collection)]
}

struct Harness {
    counters: Counters,
    builder: ApiServiceBuilder,
}

impl Harness {
    fn new(status: StatusCode, content_type: &'static str, body: Value) -> Self {
        let counters = Counters::default();
        let client = MockClient {
            status,
            content_type,
            body: if body.is_null() { String::new() } else { body.to_string() },
            async_capable: false,
            counters: counters.clone(),
        };
        let builder = ApiService::builder()
            .with_base_uri("https://api.example.org")
            .with_schema(MockSchema {
                definitions: definitions(),
                counters: counters.clone(),
            })
            .with_client(client)
            .with_validator(MockValidator {
                counters: counters.clone(),
                ..MockValidator::default()
            })
            .with_serializer(RecordingSerializer {
                inner: DefaultSerializer::default(),
                counters: counters.clone(),
            });
        Self { counters, builder }
    }

    fn map(mut self, update: impl FnOnce(ApiServiceBuilder, &Counters) -> ApiServiceBuilder) -> Self {
        self.builder = update(self.builder, &self.counters);
        self
    }

    fn async_client(self, status: StatusCode, body: Value) -> Self {
        self.map(|builder, counters| {
            builder.with_client(MockClient {
                status,
                content_type: "application/json",
                body: body.to_string(),
                async_capable: true,
                counters: counters.clone(),
            })
        })
    }

    fn violations(self, request: &[&str], response: &[&str]) -> Self {
        let violations = |properties: &[&str]| {
            properties
                .iter()
                .map(|property| ConstraintViolation::new(*property, "is invalid", "type", "body"))
                .collect::<Vec<_>>()
        };
        let (request, response) = (violations(request), violations(response));
        self.map(|builder, counters| {
            builder.with_validator(MockValidator {
                request,
                response,
                counters: counters.clone(),
            })
        })
    }

    fn build(self) -> (ApiService, Counters) {
        let service = self.builder.build().expect("valid service");
        (service, self.counters)
    }
}

fn get_feature() -> CallParams {
    CallParams::new().add_param("id", 1)
}

#[test]
fn test_decodes_item_without_validation() {
    let (service, counters) = Harness::new(StatusCode::OK, "application/json", json!({"id": 1}))
        .map(|builder, _| builder.with_validate_request(false).with_validate_response(false))
        .build();

    let (output, events) = with_info_events(|| service.call("getFeature", get_feature()));

    let output = output.expect("successful call");
    let item = output.as_resource().and_then(|it| it.as_item()).expect("an item");
    assert_eq!(item.data(), &json!({"id": 1}));
    assert_eq!(counters.sends(), 1);
    assert_eq!(counters.validations(), 0);
    assert_eq!(counters.targets(), [DecodeTarget::Resource]);
    assert_eq!(events, 2);
}

#[test]
fn test_empty_content_type_gives_empty_output() {
    let (service, counters) = Harness::new(StatusCode::NO_CONTENT, "", Value::Null).build();

    let output = service.call("getFeature", get_feature()).expect("successful call");

    assert!(output.is_empty());
    assert!(counters.targets().is_empty());
    assert_eq!(counters.validations(), 2);
}

#[test]
fn test_error_status_decodes_an_error() {
    let body = json!({"violations": [{"propertyPath": "id", "message": "Invalid id"}]});
    let (service, counters) = Harness::new(StatusCode::BAD_REQUEST, "application/json", body).build();

    let output = service.call("getFeature", get_feature()).expect("successful call");

    let error = output.as_error().expect("an error");
    assert_eq!((error.code(), error.message()), (400, "Bad Request"));
    assert_eq!(error.violations().len(), 1);
    assert_eq!(counters.targets(), [DecodeTarget::Error]);
}

#[test]
fn test_paginated_hal_collection() {
    let body = json!({
        "totalItems": 52,
        "itemsPerPage": 3,
        "_links": {
            "self": {"href": "/features?itemsPerPage=3&page=2"},
            "next": {"href": "/features?itemsPerPage=3&page=3"}
        },
        "_embedded": {"item": [{"id": 4}, {"id": 5}, {"id": 6}]}
    });
    let (service, _) = Harness::new(StatusCode::OK, "application/hal+json", body)
        .map(|builder, _| builder.with_pagination(HalPagination::default()))
        .build();

    let output = service
        .call(OperationRef::route(Method::GET, "/features"), CallParams::new())
        .expect("successful call");

    let collection = output
        .as_resource()
        .and_then(|it| it.as_collection())
        .expect("a collection");
    assert_eq!(collection.len(), 3);
    let pagination = collection.pagination().expect("paginated");
    insta::assert_json_snapshot!(pagination, @r#"
    {
      "page": 2,
      "perPage": 3,
      "totalItems": 52,
      "totalPages": 1,
      "links": {
        "first": "/features?itemsPerPage=3&page=2",
        "last": "/features?itemsPerPage=3&page=2",
        "next": "/features?itemsPerPage=3&page=3"
      }
    }
    "#);
    assert!(pagination.links().is_some_and(|it| it.has_next()));
}

#[test]
fn test_async_call_without_async_client() {
    let (service, counters) = Harness::new(StatusCode::OK, "application/json", json!({})).build();

    let (result, events) = with_info_events(|| service.call_async("getFeature", get_feature()));

    let Err(error) = result else {
        panic!("expected a failure");
    };
    insta::assert_snapshot!(error, @"The configured HTTP client does not support asynchronous requests");
    assert_eq!(counters.lookups(), 0);
    assert_eq!(counters.validations(), 0);
    assert_eq!(counters.sends(), 0);
    assert_eq!(events, 0);
}

#[test]
fn test_request_violations_prevent_sending() {
    let (service, counters) = Harness::new(StatusCode::OK, "application/json", json!({}))
        .violations(&["name"], &[])
        .build();

    let (result, events) = with_info_events(|| service.call("getFeature", get_feature()));

    let error = result.expect_err("should fail");
    insta::assert_snapshot!(error, @r"
    Request constraint violations:
    [property]: name
    [message]: is invalid
    [constraint]: type
    [location]: body
    ");
    assert_eq!(counters.sends(), 0);
    assert_eq!(events, 0);
}

#[test]
fn test_response_violations_prevent_decoding() {
    let (service, counters) = Harness::new(StatusCode::OK, "application/json", json!({"id": 1}))
        .violations(&[], &["id"])
        .build();

    let (result, events) = with_info_events(|| service.call("getFeature", get_feature()));

    assert!(matches!(result, Err(ApiServiceError::ResponseViolations(_))));
    assert_eq!(counters.sends(), 1);
    assert!(counters.targets().is_empty());
    assert_eq!(events, 2);
}

#[test]
fn test_return_response() {
    let (service, counters) =
        Harness::new(StatusCode::OK, "application/json", json!({"id": 1})).build();

    let raw = service.with_return_response(true).with_return_response(true);
    let output = raw.call("getFeature", get_feature()).expect("successful call");

    let response = output.into_response().expect("a raw response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body(), r#"{"id":1}"#);
    assert!(counters.targets().is_empty());

    assert!(!service.config().return_response);
    let output = service.call("getFeature", get_feature()).expect("successful call");
    assert!(output.as_resource().is_some());
}

#[test]
fn test_undeclared_status() {
    let (service, _) =
        Harness::new(StatusCode::INTERNAL_SERVER_ERROR, "application/json", json!({})).build();

    let error = service
        .call("getFeature", get_feature())
        .expect_err("should fail");

    insta::assert_snapshot!(error, @"No response definition for status 500 Internal Server Error");
}

#[test]
fn test_unknown_operation() {
    let (service, counters) = Harness::new(StatusCode::OK, "application/json", json!({})).build();

    let error = service.call("unknown", CallParams::new()).expect_err("should fail");

    assert!(matches!(error, ApiServiceError::Schema(SchemaError::OperationNotFound { .. })));
    assert_eq!(counters.sends(), 0);
}

#[tokio::test]
async fn test_async_call() {
    let (service, counters) = Harness::new(StatusCode::OK, "application/json", json!({}))
        .async_client(StatusCode::OK, json!({"id": 1}))
        .build();

    let pending = service
        .call_async("getFeature", get_feature())
        .expect("async capable client");
    let output = pending.await.expect("successful call");

    assert_eq!(
        output.as_resource().map(|it| it.data()),
        Some(json!({"id": 1}))
    );
    assert_eq!(counters.sends(), 1);
    assert_eq!(counters.validations(), 2);
}

#[tokio::test]
async fn test_async_call_validates_request() {
    let (service, counters) = Harness::new(StatusCode::OK, "application/json", json!({}))
        .async_client(StatusCode::OK, json!({"id": 1}))
        .violations(&["id"], &[])
        .build();

    let result = service.call_async("getFeature", get_feature());

    assert!(matches!(result, Err(ApiServiceError::RequestViolations(_))));
    assert_eq!(counters.sends(), 0);
}

#[tokio::test]
async fn test_async_call_emits_received_event_on_completion() {
    let (service, _counters) = Harness::new(StatusCode::OK, "application/json", json!({}))
        .async_client(StatusCode::OK, json!({"id": 1}))
        .build();
    let events = InfoEvents::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(events.clone()));

    let pending = service
        .call_async("getFeature", get_feature())
        .expect("async capable client");
    assert_eq!(events.0.load(Ordering::SeqCst), 1);

    pending.await.expect("successful call");
    assert_eq!(events.0.load(Ordering::SeqCst), 2);
}
