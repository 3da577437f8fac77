//! Dashboard board stats

use serde_json::Value;
use shared::models::{DashboardKind, DashboardStats};
use shared::{ApiEnvelope, GENERIC_FAILURE_CODE};

use crate::data_access::DataAccess;
use crate::normalize::normalize;

const DEFAULT_MESSAGE: &str = "Failed to fetch dashboard stats";

#[derive(Debug, Clone, Copy)]
pub struct DashboardService<'a> {
    access: &'a DataAccess,
}

impl<'a> DashboardService<'a> {
    pub(crate) fn new(access: &'a DataAccess) -> Self {
        Self { access }
    }

    /// `GET /dashboard/{kind}-dashboard-board-stats`
    pub async fn stats(&self, kind: DashboardKind) -> ApiEnvelope<DashboardStats> {
        self.access
            .tracked(async {
                let envelope: ApiEnvelope<Value> =
                    normalize(self.access.http().get(kind.path()).await, DEFAULT_MESSAGE);
                decode_stats(kind, envelope)
            })
            .await
    }
}

/// The board body is untagged, so `kind` picks the shape
fn decode_stats(kind: DashboardKind, envelope: ApiEnvelope<Value>) -> ApiEnvelope<DashboardStats> {
    let ApiEnvelope {
        success,
        code,
        message,
        data,
        meta,
        errors,
    } = envelope;

    match data.map(|value| DashboardStats::from_value(kind, value)).transpose() {
        Ok(data) => ApiEnvelope {
            success,
            code,
            message,
            data,
            meta,
            errors,
        },
        Err(e) => {
            tracing::warn!(%kind, error = %e, "Undecodable dashboard stats");
            ApiEnvelope::failure(
                GENERIC_FAILURE_CODE,
                format!("{DEFAULT_MESSAGE}: invalid response"),
            )
        }
    }
}
