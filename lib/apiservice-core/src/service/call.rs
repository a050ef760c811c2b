use std::sync::Arc;

use tracing::info;

use super::{ApiService, CallFuture, CallOutput};
use crate::ApiServiceError;
use crate::definition::{OperationDefinition, OperationRef};
use crate::request::CallParams;
use crate::serializer::{DecodeContext, DecodeTarget, extract_format};
use crate::transport::{Request, Response, content_type, duplicate};
use crate::validator::ConstraintViolations;

impl ApiService {
    /// Calls an operation and waits for its outcome.
    ///
    /// The operation is identified by its `operationId`, or by its route with
    /// [`OperationRef::route`].
    ///
    /// # Errors
    ///
    /// - [`ApiServiceError::Schema`] when the operation cannot be resolved,
    /// - [`ApiServiceError::RequestViolations`] when the request is invalid, nothing is sent,
    /// - [`ApiServiceError::Transport`] when sending fails,
    /// - [`ApiServiceError::ResponseViolations`] when the response is invalid, nothing is decoded,
    /// - [`ApiServiceError::UnknownResponse`] when the status is not declared,
    /// - a request construction or decoding error otherwise.
    pub fn call(
        &self,
        operation: impl Into<OperationRef>,
        params: CallParams,
    ) -> Result<CallOutput, ApiServiceError> {
        let definition = self.schema.operation_definition(&operation.into())?;
        let request = self.prepare(&definition, &params)?;

        info!(?request, "Sending request");
        let response = self.client.send(duplicate(&request))?;

        self.handle(&definition, &request, response)
    }

    /// Calls an operation without blocking.
    ///
    /// The request is built, validated and handed to the asynchronous client
    /// before this method returns. The response is validated and decoded when
    /// the returned future is polled to completion.
    ///
    /// # Errors
    ///
    /// Fails immediately with [`ApiServiceError::AsyncNotSupported`] when the
    /// client has no asynchronous capability, before resolving the operation.
    /// Otherwise see [`ApiService::call`].
    pub fn call_async(
        &self,
        operation: impl Into<OperationRef>,
        params: CallParams,
    ) -> Result<CallFuture, ApiServiceError> {
        let Some(client) = self.client.as_async() else {
            return Err(ApiServiceError::AsyncNotSupported);
        };

        let definition = self.schema.operation_definition(&operation.into())?;
        let request = self.prepare(&definition, &params)?;

        info!(?request, "Sending request");
        let pending = client.send_async(duplicate(&request));

        let service = self.clone();
        Ok(Box::pin(async move {
            let response = pending.await?;
            service.handle(&definition, &request, response)
        }))
    }

    fn prepare(
        &self,
        definition: &OperationDefinition,
        params: &CallParams,
    ) -> Result<Request, ApiServiceError> {
        let request = self.request_factory.create_request_from_definition(
            definition,
            &self.config.base_uri,
            params,
        )?;

        if self.config.validate_request {
            let violations = self.validator.validate_request(&request, definition);
            if let Some(violations) = ConstraintViolations::from_vec(violations) {
                return Err(ApiServiceError::RequestViolations(violations));
            }
        }

        Ok(request)
    }

    fn handle(
        &self,
        definition: &Arc<OperationDefinition>,
        request: &Request,
        response: Response,
    ) -> Result<CallOutput, ApiServiceError> {
        info!(?response, "Received response");

        if self.config.validate_response {
            let violations = self.validator.validate_response(&response, definition);
            if let Some(violations) = ConstraintViolations::from_vec(violations) {
                return Err(ApiServiceError::ResponseViolations(violations));
            }
        }

        if self.config.return_response {
            return Ok(CallOutput::Response(response));
        }

        let status = response.status();
        let Some(response_definition) = definition.response_definition(status.as_u16()) else {
            return Err(ApiServiceError::UnknownResponse { status });
        };

        let content_type = content_type(response.headers());
        if !response_definition.has_body_schema() || content_type.is_empty() {
            return Ok(CallOutput::Empty);
        }

        let target = if status.as_u16() >= 400 {
            DecodeTarget::Error
        } else {
            DecodeTarget::Resource
        };
        let context = DecodeContext {
            response: &response,
            response_definition,
            request,
            pagination: self.pagination.as_deref(),
        };
        let decoded = self.serializer.deserialize(
            response.body(),
            target,
            &extract_format(content_type),
            &context,
        )?;

        Ok(decoded.into())
    }
}
