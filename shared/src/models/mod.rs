//! Data models
//!
//! Wire types for the load-board API. Ids are the server's `_id` strings,
//! field names are camelCase on the wire.
//! Read models decode whatever the server sends; the `*Create` and
//! `*Update` shapes are the validated form schemas.

pub mod auth;
pub mod dashboard;
pub mod facility;
pub mod load;
pub mod location;
pub mod quote;
pub mod role;
pub mod user;

// Re-exports
pub use auth::*;
pub use dashboard::*;
pub use facility::*;
pub use load::{Load, LoadAlert, LoadCreate, LoadStatus, LoadStatusUpdate, LoadUpdate};
pub use location::*;
pub use quote::*;
pub use role::*;
pub use user::*;
