//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::{ClientError, ClientResult};

/// Path prefix every endpoint lives under
pub const API_PREFIX: &str = "/api";

/// Client configuration
///
/// # Environment variables
///
/// | variable | default | meaning |
/// |----------|---------|---------|
/// | LOADBOARD_SERVER_URL | http://localhost:5000 | server origin |
/// | LOADBOARD_MAPS_API_KEY | - | mapping/geocoding provider key |
/// | LOADBOARD_DEV_PORT | 3000 | local dev port |
/// | LOADBOARD_TIMEOUT_SECS | 30 | request timeout |
/// | LOADBOARD_CREDENTIAL_PATH | .loadboard/credential.json | session file |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server origin (e.g., "http://localhost:5000"), without `/api`
    pub server_origin: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Key for the map/geocoding provider; handed to map views as-is
    pub maps_api_key: Option<String>,

    /// Port of the local dev server
    pub dev_port: u16,

    /// Where the session credential is persisted
    pub credential_path: PathBuf,
}

impl ClientConfig {
    /// Create a configuration for the given server origin
    pub fn new(server_origin: impl Into<String>) -> Self {
        Self {
            server_origin: server_origin.into(),
            timeout: 30,
            maps_api_key: None,
            dev_port: 3000,
            credential_path: PathBuf::from(".loadboard/credential.json"),
        }
    }

    /// Load from the environment, reading `.env` first if present
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            server_origin: std::env::var("LOADBOARD_SERVER_URL")
                .unwrap_or(defaults.server_origin),
            timeout: parse_timeout(std::env::var("LOADBOARD_TIMEOUT_SECS").ok())
                .unwrap_or(defaults.timeout),
            maps_api_key: std::env::var("LOADBOARD_MAPS_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            dev_port: std::env::var("LOADBOARD_DEV_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.dev_port),
            credential_path: std::env::var("LOADBOARD_CREDENTIAL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.credential_path),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the map provider key
    pub fn with_maps_api_key(mut self, key: impl Into<String>) -> Self {
        self.maps_api_key = Some(key.into());
        self
    }

    /// Set the credential file path
    pub fn with_credential_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credential_path = path.into();
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// `{origin}/api`, the base every endpoint path is joined to
    pub fn api_base_url(&self) -> ClientResult<String> {
        let origin = self.server_origin.trim().trim_end_matches('/');
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "server origin must be an http(s) URL, got {:?}",
                self.server_origin
            )));
        }
        Ok(format!("{origin}{API_PREFIX}"))
    }
}

/// Timeout in whole seconds; zero and unparsable values are ignored
fn parse_timeout(raw: Option<String>) -> Option<u64> {
    raw?.trim().parse().ok().filter(|&secs| secs > 0)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_url() {
        let config = ClientConfig::new("https://loads.example.com/");
        assert_eq!(config.api_base_url().unwrap(), "https://loads.example.com/api");
    }

    #[test]
    fn test_rejects_non_http_origin() {
        let config = ClientConfig::new("loads.example.com");
        assert!(matches!(config.api_base_url(), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_timeout_parsing() {
        assert_eq!(parse_timeout(Some("12".into())), Some(12));
        assert_eq!(parse_timeout(Some(" 7 ".into())), Some(7));
        assert_eq!(parse_timeout(Some("0".into())), None);
        assert_eq!(parse_timeout(Some("soon".into())), None);
        assert_eq!(parse_timeout(None), None);
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::default()
            .with_timeout(5)
            .with_maps_api_key("pk.test")
            .with_credential_path("/tmp/cred.json");
        assert_eq!(config.timeout_duration(), Duration::from_secs(5));
        assert_eq!(config.maps_api_key.as_deref(), Some("pk.test"));
        assert_eq!(config.credential_path, PathBuf::from("/tmp/cred.json"));
        assert_eq!(config.dev_port, 3000);
    }
}
