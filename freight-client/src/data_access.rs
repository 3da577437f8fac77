//! Generic data access
//!
//! One instance wraps an [`HttpClient`] and a [`RequestTracker`]. Every
//! operation returns its own [`ApiEnvelope`]; failures never escape as
//! errors. The tracker is there for callers that want a shared loading
//! indicator.

use std::future::Future;

use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{ApiEnvelope, FieldErrors, FormSchema, ListQuery};
use tokio::sync::watch;

use crate::ClientError;
use crate::http::HttpClient;
use crate::normalize::{from_error, normalize};
use crate::resource::{Creatable, Listable, Readable, Removable, Updatable};
use crate::services::{AuthService, DashboardService, LoadActions};
use crate::tracker::{RequestState, RequestTracker};

/// Typed CRUD over the resource markers
#[derive(Debug, Clone)]
pub struct DataAccess {
    http: HttpClient,
    tracker: RequestTracker,
}

impl DataAccess {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            tracker: RequestTracker::new(),
        }
    }

    /// Share a tracker with other instances
    pub fn with_tracker(http: HttpClient, tracker: RequestTracker) -> Self {
        Self { http, tracker }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Snapshot of the loading/error state
    pub fn state(&self) -> RequestState {
        self.tracker.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.tracker.subscribe()
    }

    // ========== CRUD ==========

    /// `GET /{path}?{query}`
    pub async fn get<R: Listable>(&self, query: &ListQuery) -> ApiEnvelope<Vec<R::Item>> {
        let path = if query.is_empty() {
            R::PATH.to_string()
        } else {
            format!("{}?{}", R::PATH, query.to_query_string())
        };
        let message = format!("Failed to fetch {} list", R::NAME);
        self.call(Method::GET, &path, None, &message).await
    }

    /// `GET /{path}/{id}`
    pub async fn get_by_id<R: Readable>(&self, id: &str) -> ApiEnvelope<R::Item> {
        let path = match R::item_path(id) {
            Ok(path) => path,
            Err(errors) => return self.reject(R::NAME, errors),
        };
        let message = format!("Failed to fetch {}", R::NAME);
        self.call(Method::GET, &path, None, &message).await
    }

    /// `POST /{path}`; nothing is sent when the form fails validation
    pub async fn create<R: Creatable>(&self, form: &R::Create) -> ApiEnvelope<R::Item> {
        let payload = match form.to_payload() {
            Ok(payload) => payload,
            Err(errors) => return self.reject(R::NAME, errors),
        };
        let message = format!("Failed to create {}", R::NAME);
        self.call(Method::POST, R::PATH, Some(&payload), &message)
            .await
    }

    /// Coerce raw form input, then [`DataAccess::create`]
    pub async fn create_from_form<R: Creatable>(&self, input: Value) -> ApiEnvelope<R::Item> {
        match R::Create::from_form(input) {
            Ok(form) => self.create::<R>(&form).await,
            Err(errors) => self.reject(R::NAME, errors),
        }
    }

    /// `PUT /{path}/{id}` with the present fields only
    pub async fn update<R: Updatable>(&self, id: &str, form: &R::Update) -> ApiEnvelope<R::Item> {
        let path = match R::item_path(id) {
            Ok(path) => path,
            Err(errors) => return self.reject(R::NAME, errors),
        };
        let payload = match form.to_payload() {
            Ok(payload) => payload,
            Err(errors) => return self.reject(R::NAME, errors),
        };
        let message = format!("Failed to update {}", R::NAME);
        self.call(Method::PUT, &path, Some(&payload), &message).await
    }

    /// `DELETE /{path}/{id}`
    pub async fn remove<R: Removable>(&self, id: &str) -> ApiEnvelope<Value> {
        let path = match R::item_path(id) {
            Ok(path) => path,
            Err(errors) => return self.reject(R::NAME, errors),
        };
        let message = format!("Failed to delete {}", R::NAME);
        self.call(Method::DELETE, &path, None, &message).await
    }

    // ========== Domain services ==========

    pub fn loads(&self) -> LoadActions<'_> {
        LoadActions::new(self)
    }

    pub fn dashboard(&self) -> DashboardService<'_> {
        DashboardService::new(self)
    }

    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    // ========== Internals ==========

    /// Run one call under the tracker
    pub(crate) async fn tracked<T>(
        &self,
        call: impl Future<Output = ApiEnvelope<T>>,
    ) -> ApiEnvelope<T> {
        let guard = self.tracker.begin();
        let envelope = call.await;
        guard.settle(&envelope);
        envelope
    }

    /// Send, normalize and track
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        default_message: &str,
    ) -> ApiEnvelope<T> {
        self.tracked(async {
            normalize(
                self.http.request(method, path, body, None).await,
                default_message,
            )
        })
        .await
    }

    /// [`DataAccess::call`] with a typed body
    pub(crate) async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        default_message: &str,
    ) -> ApiEnvelope<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.tracked(async {
            normalize(
                self.http.request(method, path, Some(body), None).await,
                default_message,
            )
        })
        .await
    }

    /// Validation failure: recorded like any other failure, never sent
    pub(crate) fn reject<T>(&self, form: &str, errors: FieldErrors) -> ApiEnvelope<T> {
        tracing::debug!(form, %errors, "Form rejected before sending");
        let envelope = from_error(&ClientError::Validation(errors), "");
        self.tracker.begin().settle(&envelope);
        envelope
    }
}
