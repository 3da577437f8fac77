//! API Response types
//!
//! Every load-board endpoint answers with the same envelope:
//! ```json
//! {
//!     "success": true,
//!     "code": 200,
//!     "message": "OK",
//!     "data": { ... },
//!     "meta": { "page": 1, "limit": 10, "totalPages": 1, "totalItems": 1 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FieldError, FieldErrors};

/// Code used when the failure carries no status of its own (network error, bad body)
pub const GENERIC_FAILURE_CODE: u16 = 500;

/// Code used for client-side schema rejections
pub const VALIDATION_FAILURE_CODE: u16 = 422;

/// Code used when the server rejected the session
pub const UNAUTHORIZED_CODE: u16 = 401;

/// Normalized response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default = "none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "ResponseMeta::is_empty")]
    pub meta: ResponseMeta,
    /// Field-level validation errors (client-side rejections only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

// `#[serde(default)]` on `Option<T>` would require `T: Default`
fn none<T>() -> Option<T> {
    None
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            code: 200,
            message: "OK".to_string(),
            data: Some(data),
            meta: ResponseMeta::default(),
            errors: Vec::new(),
        }
    }

    /// Successful envelope without a payload (204, bodiless DELETE)
    pub fn empty(code: u16) -> Self {
        Self {
            success: true,
            code,
            message: "OK".to_string(),
            data: None,
            meta: ResponseMeta::default(),
            errors: Vec::new(),
        }
    }

    /// Failed envelope; `data` is always `None`
    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            message: message.into(),
            data: None,
            meta: ResponseMeta::default(),
            errors: Vec::new(),
        }
    }

    /// Failed envelope for a schema rejection
    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            errors: errors.into_inner(),
            ..Self::failure(VALIDATION_FAILURE_CODE, "Validation failed")
        }
    }

    /// Attach pagination metadata
    pub fn with_meta(mut self, meta: ResponseMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Message to show the user when the call failed
    pub fn error_message(&self) -> Option<&str> {
        (!self.success).then_some(self.message.as_str())
    }

    /// Convert the payload type, keeping status and metadata
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiEnvelope<U> {
        ApiEnvelope {
            success: self.success,
            code: self.code,
            message: self.message,
            data: self.data.map(f),
            meta: self.meta,
            errors: self.errors,
        }
    }

    /// Same outcome and metadata with no payload
    pub fn without_data<U>(self) -> ApiEnvelope<U> {
        ApiEnvelope {
            success: self.success,
            code: self.code,
            message: self.message,
            data: None,
            meta: self.meta,
            errors: self.errors,
        }
    }

    /// Drop the payload, keeping only the outcome
    pub fn discard(self) -> ApiEnvelope<Value> {
        self.map(|_| Value::Null)
    }

    /// Turn into a plain `Result`, dropping the envelope metadata
    pub fn into_result(self) -> Result<Option<T>, (u16, String)> {
        if self.success {
            Ok(self.data)
        } else {
            Err((self.code, self.message))
        }
    }
}

/// Response metadata; pagination when the endpoint is a list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    /// Any other keys the server sends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseMeta {
    /// Build pagination metadata, deriving the page count
    pub fn paginated(page: u32, limit: u32, total_items: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_items.div_ceil(limit as u64) as u32
        };
        Self {
            page: Some(page),
            limit: Some(limit),
            total_pages: Some(total_pages),
            total_items: Some(total_items),
            extra: Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.page.is_none()
            && self.limit.is_none()
            && self.total_pages.is_none()
            && self.total_items.is_none()
            && self.extra.is_empty()
    }

    /// Whether another page follows the current one
    pub fn has_next_page(&self) -> bool {
        match (self.page, self.total_pages) {
            (Some(page), Some(total)) => page < total,
            _ => false,
        }
    }
}
