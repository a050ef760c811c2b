use tracing::debug;

use super::{AsyncHttpClient, HttpClient, Request, Response, ResponseFuture, TransportError};

/// Blocking [`HttpClient`] backed by [`reqwest::blocking::Client`].
///
/// This client has no asynchronous capability: an
/// [`ApiService::call_async`](crate::ApiService::call_async) fails immediately with it.
///
/// Like the underlying reqwest client, it must not be created or dropped
/// inside an async runtime (use `tokio::task::spawn_blocking`).
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with reqwest defaults.
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<reqwest::blocking::Client> for ReqwestClient {
    fn from(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: Request) -> Result<Response, TransportError> {
        let request = reqwest::blocking::Request::try_from(request)?;
        debug!(method = %request.method(), url = %request.url(), "executing blocking request");
        let response = self.client.execute(request)?;

        let mut builder = http::Response::builder()
            .status(response.status())
            .version(response.version());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(response.headers().clone());
        }
        let body = response.text()?;

        Ok(builder.body(body)?)
    }
}

/// Asynchronous [`HttpClient`] backed by [`reqwest::Client`].
///
/// The blocking [`HttpClient::send`] drives the request on the current tokio
/// runtime through `block_in_place` (multi-threaded runtime required), or on a
/// dedicated current-thread runtime when called outside of any runtime.
#[derive(Debug, Clone, Default)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a client with reqwest defaults.
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<reqwest::Client> for AsyncReqwestClient {
    fn from(client: reqwest::Client) -> Self {
        Self { client }
    }
}

async fn execute(client: reqwest::Client, request: Request) -> Result<Response, TransportError> {
    let request = reqwest::Request::try_from(request)?;
    debug!(method = %request.method(), url = %request.url(), "executing request");
    let response = client.execute(request).await?;

    let mut builder = http::Response::builder()
        .status(response.status())
        .version(response.version());
    if let Some(headers) = builder.headers_mut() {
        headers.extend(response.headers().clone());
    }
    let body = response.text().await?;

    Ok(builder.body(body)?)
}

impl HttpClient for AsyncReqwestClient {
    fn send(&self, request: Request) -> Result<Response, TransportError> {
        let future = execute(self.client.clone(), request);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => tokio::task::block_in_place(|| handle.block_on(future)),
            Err(_) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(future),
        }
    }

    fn as_async(&self) -> Option<&dyn AsyncHttpClient> {
        Some(self)
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    fn send_async(&self, request: Request) -> ResponseFuture {
        Box::pin(execute(self.client.clone(), request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_client_has_no_async_capability() {
        let client = ReqwestClient::new();

        assert!(client.as_async().is_none());
    }

    #[test]
    fn test_async_client_exposes_async_capability() {
        let client = AsyncReqwestClient::new();

        assert!(client.as_async().is_some());
    }

    #[test]
    fn test_invalid_uri_is_a_transport_error() {
        let client = AsyncReqwestClient::new();
        let request = http::Request::builder()
            .uri("/relative/only")
            .body(String::new())
            .expect("valid request");

        let result = client.send(request);

        assert!(matches!(result, Err(TransportError::ReqwestError(_))));
    }
}
