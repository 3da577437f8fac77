//! Response/error normalization
//!
//! Turns whatever the adapter produced into an [`ApiEnvelope`]:
//! - 2xx: the server's own envelope, passed through as-is; if `data` does
//!   not fit the expected type the outcome is kept and `data` dropped
//! - non-2xx: `code` from the error body (else the HTTP status), `message`
//!   from the error body (else the caller's default)
//! - no response at all: [`GENERIC_FAILURE_CODE`] and the caller's default
//!
//! `data` is always `None` on failure.

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{ApiEnvelope, GENERIC_FAILURE_CODE, UNAUTHORIZED_CODE};

use crate::ClientError;
use crate::ClientResult;
use crate::transport::RawResponse;

/// Message used when the server rejected the session
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired";

/// Normalize the outcome of one adapter call
pub fn normalize<T: DeserializeOwned>(
    result: ClientResult<RawResponse>,
    default_message: &str,
) -> ApiEnvelope<T> {
    match result {
        Ok(response) => from_response(response, default_message),
        Err(error) => from_error(&error, default_message),
    }
}

/// Normalize a response that did arrive
pub fn from_response<T: DeserializeOwned>(
    response: RawResponse,
    default_message: &str,
) -> ApiEnvelope<T> {
    if !response.is_success() {
        return from_error(&api_error(&response), default_message);
    }

    // 204 / empty DELETE bodies carry no envelope
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return ApiEnvelope::empty(response.status.as_u16());
    }

    match response.json::<ApiEnvelope<T>>() {
        Ok(mut envelope) => {
            if !envelope.success {
                envelope.data = None;
            }
            envelope
        }
        Err(e) => match response.json::<ApiEnvelope<Value>>() {
            Ok(envelope) => {
                tracing::warn!(status = %response.status, error = %e, "Response data has an unexpected shape");
                envelope.without_data()
            }
            Err(e) => {
                tracing::warn!(status = %response.status, error = %e, "Undecodable response body");
                ApiEnvelope::failure(GENERIC_FAILURE_CODE, format!("{default_message}: invalid response"))
            }
        },
    }
}

/// Normalize an error
pub fn from_error<T>(error: &ClientError, default_message: &str) -> ApiEnvelope<T> {
    match error {
        ClientError::Api { status, code, message } => ApiEnvelope::failure(
            code.unwrap_or(status.as_u16()),
            if message.is_empty() {
                default_message.to_string()
            } else {
                message.clone()
            },
        ),
        ClientError::Unauthorized => {
            ApiEnvelope::failure(UNAUTHORIZED_CODE, SESSION_EXPIRED_MESSAGE)
        }
        ClientError::Validation(errors) => ApiEnvelope::invalid(errors.clone()),
        ClientError::Http(e) => ApiEnvelope::failure(
            e.status().map(|s| s.as_u16()).unwrap_or(GENERIC_FAILURE_CODE),
            default_message,
        ),
        _ => ApiEnvelope::failure(GENERIC_FAILURE_CODE, default_message),
    }
}

/// Build `ClientError::Api` from a non-2xx response
///
/// The error body may be an envelope (`{"code": 404, "message": ...}`) or a
/// bare `{"error": ...}`; anything else yields an empty message.
pub fn api_error(response: &RawResponse) -> ClientError {
    let body: Option<Value> = serde_json::from_slice(&response.body).ok();

    let code = body
        .as_ref()
        .and_then(|b| b.get("code"))
        .and_then(Value::as_u64)
        .and_then(|c| u16::try_from(c).ok());

    let message = body
        .as_ref()
        .and_then(|b| {
            b.get("message")
                .and_then(Value::as_str)
                .or_else(|| b.get("error").and_then(Value::as_str))
        })
        .unwrap_or_default()
        .to_string();

    ClientError::Api {
        status: response.status,
        code,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{HeaderMap, StatusCode};
    use serde_json::json;

    fn response(status: StatusCode, body: &str) -> RawResponse {
        RawResponse {
            status,
            headers: HeaderMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[test]
    fn test_success_passes_through() {
        let body = json!({
            "success": true,
            "code": 200,
            "message": "OK",
            "data": {"_id": "1"},
            "meta": {"page": 1}
        });
        let envelope: ApiEnvelope<Value> =
            from_response(response(StatusCode::OK, &body.to_string()), "Failed");
        assert_eq!(serde_json::to_value(&envelope).unwrap(), body);
    }

    #[test]
    fn test_error_body_message_wins() {
        let envelope: ApiEnvelope<Value> = from_response(
            response(
                StatusCode::NOT_FOUND,
                r#"{"success":false,"code":404,"message":"Load not found"}"#,
            ),
            "Failed to fetch load",
        );
        assert!(!envelope.success);
        assert_eq!(envelope.code, 404);
        assert_eq!(envelope.message, "Load not found");
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_error_without_body_uses_default() {
        let envelope: ApiEnvelope<Value> =
            from_response(response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"), "Failed to fetch loads");
        assert_eq!(envelope.code, 502);
        assert_eq!(envelope.message, "Failed to fetch loads");
    }

    #[test]
    fn test_bare_error_key() {
        let envelope: ApiEnvelope<Value> = from_response(
            response(StatusCode::CONFLICT, r#"{"error":"Load already assigned"}"#),
            "Failed",
        );
        assert_eq!(envelope.code, 409);
        assert_eq!(envelope.message, "Load already assigned");
    }

    #[test]
    fn test_empty_success_body() {
        let envelope: ApiEnvelope<Value> = from_response(response(StatusCode::NO_CONTENT, ""), "Failed");
        assert!(envelope.success);
        assert_eq!(envelope.code, 204);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_undecodable_success_body() {
        let envelope: ApiEnvelope<Value> = from_response(response(StatusCode::OK, "not json"), "Failed to fetch");
        assert!(!envelope.success);
        assert_eq!(envelope.code, GENERIC_FAILURE_CODE);
    }

    #[test]
    fn test_mismatched_data_keeps_success() {
        let envelope: ApiEnvelope<Vec<u32>> = from_response(
            response(
                StatusCode::OK,
                r#"{"success":true,"code":200,"message":"OK","data":{"rows":[]},"meta":{"page":1}}"#,
            ),
            "Failed",
        );
        assert!(envelope.success);
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.meta.page, Some(1));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_success_flag_false_drops_data() {
        let envelope: ApiEnvelope<Value> = from_response(
            response(StatusCode::OK, r#"{"success":false,"code":200,"message":"nope","data":[1]}"#),
            "Failed",
        );
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_transport_and_auth_errors() {
        let envelope: ApiEnvelope<Value> =
            from_error(&ClientError::Transport("connection refused".into()), "Failed to fetch loads");
        assert_eq!(envelope.code, GENERIC_FAILURE_CODE);
        assert_eq!(envelope.message, "Failed to fetch loads");

        let envelope: ApiEnvelope<Value> = from_error(&ClientError::Unauthorized, "Failed");
        assert_eq!(envelope.code, UNAUTHORIZED_CODE);
        assert_eq!(envelope.message, SESSION_EXPIRED_MESSAGE);
    }
}
