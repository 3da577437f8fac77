// freight-client/src/transport.rs
// Transport layer: moves raw requests, knows nothing about sessions or envelopes

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use bytes::Bytes;
use http::{HeaderMap, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use crate::{ClientError, ClientResult};

/// Fully-built outgoing request
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub method: Method,
    /// Absolute URL including the query string
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Response as received, before any interpretation
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as (lossy) UTF-8 text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ClientError::InvalidResponse(format!("JSON parse error: {}", e)))
    }
}

/// Sends one request and returns whatever came back
///
/// Implementations only fail when no response was obtained at all;
/// every HTTP status, including errors, is a successful `RawResponse`.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, request: RawRequest) -> ClientResult<RawResponse>;
}

/// Network transport backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an already-configured reqwest client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: RawRequest) -> ClientResult<RawResponse> {
        let mut req = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// In-process transport: drives an axum `Router` through tower's `oneshot`
///
/// No sockets are opened; useful for tests and for embedding a server in
/// the same process.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get};
/// use freight_client::RouterTransport;
///
/// let router = Router::new().route("/api/load", get(list_loads));
/// let transport = RouterTransport::new(router);
/// ```
#[derive(Debug, Clone)]
pub struct RouterTransport {
    router: Router,
}

impl RouterTransport {
    /// `router` must already have its state attached (`with_state`)
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

#[async_trait]
impl Transport for RouterTransport {
    async fn send(&self, request: RawRequest) -> ClientResult<RawResponse> {
        let mut builder = Request::builder().method(request.method).uri(request.url.as_str());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(request.headers);
        }
        let http_request = builder
            .body(request.body.map(Body::from).unwrap_or_else(Body::empty))
            .map_err(|e| ClientError::Transport(format!("Failed to build request: {}", e)))?;

        let response = self
            .router
            .clone()
            .oneshot(http_request)
            .await
            .map_err(|e| ClientError::Transport(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read body: {}", e)))?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
