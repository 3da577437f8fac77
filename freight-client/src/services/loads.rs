//! Load workflow actions

use http::Method;
use serde_json::Value;
use shared::ApiEnvelope;
use shared::FormSchema;
use shared::models::{Load, LoadAlert, LoadStatus, LoadStatusUpdate};

use crate::data_access::DataAccess;
use crate::resource::path_segment;

/// Status changes, carrier requests and alerts on `/load`
#[derive(Debug, Clone, Copy)]
pub struct LoadActions<'a> {
    access: &'a DataAccess,
}

impl<'a> LoadActions<'a> {
    pub(crate) fn new(access: &'a DataAccess) -> Self {
        Self { access }
    }

    /// `PUT /load/{id}/status`
    pub async fn update_status(&self, id: &str, status: LoadStatus) -> ApiEnvelope<Load> {
        let id = match path_segment(id) {
            Ok(id) => id,
            Err(errors) => return self.access.reject("load status", errors),
        };
        self.access
            .send(
                Method::PUT,
                &format!("load/{id}/status"),
                &LoadStatusUpdate { status },
                "Failed to update load status",
            )
            .await
    }

    /// `POST /load/request/{id}`: a carrier asks to haul the load
    pub async fn request(&self, id: &str) -> ApiEnvelope<Load> {
        let id = match path_segment(id) {
            Ok(id) => id,
            Err(errors) => return self.access.reject("load request", errors),
        };
        self.access
            .call(
                Method::POST,
                &format!("load/request/{id}"),
                None,
                "Failed to request load",
            )
            .await
    }

    /// `POST /load/rateconfirm/{id}`: send the rate confirmation
    pub async fn rate_confirm(&self, id: &str) -> ApiEnvelope<Value> {
        let id = match path_segment(id) {
            Ok(id) => id,
            Err(errors) => return self.access.reject("rate confirmation", errors),
        };
        self.access
            .call(
                Method::POST,
                &format!("load/rateconfirm/{id}"),
                None,
                "Failed to send rate confirmation",
            )
            .await
    }

    /// `POST /load/create-alert`
    pub async fn create_alert(&self, alert: &LoadAlert) -> ApiEnvelope<Value> {
        let payload = match alert.to_payload() {
            Ok(payload) => payload,
            Err(errors) => return self.access.reject("load alert", errors),
        };
        self.access
            .call(
                Method::POST,
                "load/create-alert",
                Some(&payload),
                "Failed to create load alert",
            )
            .await
    }

    /// `POST /load/refresh-age`: recompute posting age on the server
    pub async fn refresh_age(&self) -> ApiEnvelope<Value> {
        self.access
            .call(
                Method::POST,
                "load/refresh-age",
                None,
                "Failed to refresh load age",
            )
            .await
    }
}
