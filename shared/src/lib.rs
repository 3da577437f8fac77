//! Shared types for the load-board client
//!
//! Wire types used by `freight-client` and any other consumer of the
//! load-board REST API: the response envelope, list queries, entity
//! models and their form schemas.

pub mod error;
pub mod models;
pub mod request;
pub mod response;
pub mod schema;

// Re-exports
pub use error::{FieldError, FieldErrors};
pub use request::{ListQuery, QueryError, SortDirection, SortSpec};
pub use response::{
    ApiEnvelope, GENERIC_FAILURE_CODE, ResponseMeta, UNAUTHORIZED_CODE, VALIDATION_FAILURE_CODE,
};
pub use schema::{FormSchema, strip_empty};
pub use serde::{Deserialize, Serialize};
