//! Client error types

use http::StatusCode;
use shared::FieldErrors;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-reqwest transport failure (in-process router, request building)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Api {
        status: StatusCode,
        /// Numeric `code` from the error body, when the server sent one
        code: Option<u16>,
        message: String,
    },

    /// Server rejected the session; the credential has been cleared
    #[error("Authentication required")]
    Unauthorized,

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client-side schema check failed; nothing was sent
    #[error("Validation error: {0}")]
    Validation(#[from] FieldErrors),

    /// Credential store I/O failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    /// HTTP status associated with this error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the failure happened before any server answered
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Transport(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
