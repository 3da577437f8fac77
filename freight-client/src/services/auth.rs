//! Login and logout

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue, Method};
use serde_json::Value;
use shared::models::{LoginRequest, LoginResponse};
use shared::{ApiEnvelope, FormSchema, GENERIC_FAILURE_CODE};

use crate::data_access::DataAccess;
use crate::normalize::normalize;

#[derive(Debug, Clone, Copy)]
pub struct AuthService<'a> {
    access: &'a DataAccess,
}

impl<'a> AuthService<'a> {
    pub(crate) fn new(access: &'a DataAccess) -> Self {
        Self { access }
    }

    /// `POST /auth/login`; on success the token becomes the session credential
    pub async fn login(&self, email: &str, password: &str) -> ApiEnvelope<LoginResponse> {
        let request = LoginRequest::new(email, password);
        let payload = match request.to_payload() {
            Ok(payload) => payload,
            Err(errors) => return self.access.reject("login", errors),
        };

        self.access
            .tracked(async {
                let envelope: ApiEnvelope<LoginResponse> = normalize(
                    self.access
                        .http()
                        .request(Method::POST, "auth/login", Some(&payload), None)
                        .await,
                    "Login failed",
                );

                let Some(login) = envelope.data.as_ref().filter(|_| envelope.success) else {
                    return envelope;
                };

                if let Err(e) = self.access.http().session().sign_in(login.token.as_str()) {
                    tracing::error!(error = %e, "Failed to store session credential");
                    return ApiEnvelope::failure(
                        GENERIC_FAILURE_CODE,
                        format!("Failed to store session: {e}"),
                    );
                }

                tracing::info!(user_id = %login.user.id, email = %request.email, "Logged in");
                envelope
            })
            .await
    }

    /// `POST /auth/logout`; the local session is cleared whatever the server says
    ///
    /// The session is signed out before the call, so a 401 from an already
    /// expired token never runs the auth-failure hook.
    pub async fn logout(&self) -> ApiEnvelope<Value> {
        let session = self.access.http().session();
        let Some(token) = session.token() else {
            return ApiEnvelope::empty(200);
        };

        if let Err(e) = session.sign_out() {
            tracing::warn!(error = %e, "Failed to clear stored credential");
        }

        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
            headers.insert(AUTHORIZATION, value);
        }

        let envelope = self
            .access
            .tracked(async {
                normalize(
                    self.access
                        .http()
                        .request::<Value>(Method::POST, "auth/logout", None, Some(headers))
                        .await,
                    "Logout failed",
                )
            })
            .await;

        tracing::info!(server_ack = envelope.success, "Logged out");
        envelope
    }
}
