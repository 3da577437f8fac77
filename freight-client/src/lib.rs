//! Freight Client - typed client for the load-board REST API
//!
//! Layers, bottom up:
//! - [`Transport`]: moves raw requests (reqwest, or an in-process axum router)
//! - [`HttpClient`]: base URL, bearer token, 401 session teardown
//! - [`normalize`]: every outcome becomes an [`ApiEnvelope`]
//! - [`DataAccess`]: typed CRUD over the [`resource`] markers, plus the
//!   load, dashboard and auth services
//!
//! ```ignore
//! use freight_client::{ClientConfig, DataAccess, FileCredentialStore, HttpClient, Session};
//! use freight_client::resource::Users;
//! use shared::ListQuery;
//!
//! let config = ClientConfig::from_env();
//! let session = Session::new(FileCredentialStore::new(&config.credential_path))
//!     .with_on_auth_failure(|| eprintln!("session expired, please log in again"));
//! let access = DataAccess::new(HttpClient::new(&config, session)?);
//!
//! let customers = access
//!     .get::<Users>(&"?role=customer&page=1&limit=10".parse()?)
//!     .await;
//! ```

pub mod config;
pub mod data_access;
pub mod error;
pub mod http;
pub mod normalize;
pub mod resource;
pub mod services;
pub mod session;
pub mod tracker;
pub mod transport;

pub use config::ClientConfig;
pub use data_access::DataAccess;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use services::{AuthService, DashboardService, LoadActions};
pub use session::{
    AuthFailureHook, CredentialStore, FileCredentialStore, MemoryCredentialStore, Session,
};
pub use tracker::{CallGuard, RequestState, RequestTracker};
pub use transport::{RawRequest, RawResponse, ReqwestTransport, RouterTransport, Transport};

// Re-export shared types for convenience
pub use shared::{ApiEnvelope, FieldError, FieldErrors, ListQuery, ResponseMeta};
