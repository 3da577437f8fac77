//! HTTP client adapter
//!
//! Joins paths to the API base URL, attaches the session's bearer token and
//! applies the auth-failure policy. There is no retry and no token refresh:
//! a single 401 ends the session.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, Method, StatusCode};
use serde::Serialize;

use crate::session::Session;
use crate::transport::{RawRequest, RawResponse, ReqwestTransport, Transport};
use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for the load-board API
#[derive(Debug, Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    session: Session,
}

impl HttpClient {
    /// Create a network client from configuration
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        let transport = ReqwestTransport::new(config.timeout_duration())?;
        Ok(Self::with_transport(config.api_base_url()?, transport, session))
    }

    /// Create a client over any transport; `base_url` already includes `/api`
    pub fn with_transport(
        base_url: impl Into<String>,
        transport: impl Transport + 'static,
        session: Session,
    ) -> Self {
        Self {
            transport: Arc::new(transport),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Base URL (`{origin}/api`)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Absolute URL for an endpoint path (`load/42` or `/load/42`)
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one request
    ///
    /// Non-2xx statuses come back as `Ok`, except a 401 on an authenticated
    /// call: the session is torn down (at most once per sign-in) and
    /// `ClientError::Unauthorized` is returned. Transport failures propagate
    /// as errors.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        headers: Option<HeaderMap>,
    ) -> ClientResult<RawResponse> {
        let url = self.url(path);
        let credential = self.session.credential();

        let mut request_headers = HeaderMap::new();
        if let Some(credential) = &credential {
            let value = HeaderValue::from_str(&format!("Bearer {}", credential.token))
                .map_err(|_| ClientError::Config("bearer token is not a valid header value".into()))?;
            request_headers.insert(AUTHORIZATION, value);
        }

        let body = match body {
            Some(body) => {
                request_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Some(Bytes::from(serde_json::to_vec(body)?))
            }
            None => None,
        };

        // Caller headers win
        if let Some(extra) = headers {
            for (name, value) in extra.iter() {
                request_headers.insert(name.clone(), value.clone());
            }
        }

        tracing::debug!(%method, %url, authenticated = credential.is_some(), "Sending request");

        let response = self
            .transport
            .send(RawRequest {
                method: method.clone(),
                url: url.clone(),
                headers: request_headers,
                body,
            })
            .await
            .inspect_err(|e| tracing::warn!(%method, %url, error = %e, "Request failed"))?;

        tracing::debug!(%method, %url, status = %response.status, "Received response");

        // A 401 without a token (bad login) is an ordinary API error
        if response.status == StatusCode::UNAUTHORIZED
            && let Some(credential) = credential
        {
            if self.session.invalidate(credential.generation) {
                tracing::warn!(%url, "Session rejected by server, credential cleared");
            }
            return Err(ClientError::Unauthorized);
        }

        Ok(response)
    }

    /// GET without a body
    pub async fn get(&self, path: &str) -> ClientResult<RawResponse> {
        self.request::<()>(Method::GET, path, None, None).await
    }

    /// POST with a JSON body
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<RawResponse> {
        self.request(Method::POST, path, Some(body), None).await
    }

    /// POST without a body
    pub async fn post_empty(&self, path: &str) -> ClientResult<RawResponse> {
        self.request::<()>(Method::POST, path, None, None).await
    }

    /// PUT with a JSON body
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<RawResponse> {
        self.request(Method::PUT, path, Some(body), None).await
    }

    /// DELETE without a body
    pub async fn delete(&self, path: &str) -> ClientResult<RawResponse> {
        self.request::<()>(Method::DELETE, path, None, None).await
    }
}
