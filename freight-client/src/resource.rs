//! Resource markers for the generic data-access layer.
//!
//! Each endpoint family is a zero-sized marker type. [`Resource`] gives its
//! base path and item type; the capability traits say which operations it
//! supports. An operation a resource does not declare does not compile:
//!
//! ```compile_fail
//! use freight_client::resource::{Listable, Resource};
//! use freight_client::{DataAccess, HttpClient, Session};
//! # use freight_client::RouterTransport;
//!
//! /// Read-only report feed
//! struct Reports;
//!
//! impl Resource for Reports {
//!     const NAME: &'static str = "report";
//!     const PATH: &'static str = "report";
//!     type Item = serde_json::Value;
//! }
//! impl Listable for Reports {}
//!
//! async fn purge(access: &DataAccess) {
//!     // `Reports` is not `Removable`
//!     let _ = access.remove::<Reports>("r-1").await;
//! }
//! ```

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use shared::{FieldError, FieldErrors, FormSchema};
use shared::models::{
    Facility, FacilityCreate, FacilityUpdate, Load, LoadCreate, LoadUpdate, Quote, QuoteCreate,
    QuoteUpdate, Role, RoleCreate, RoleUpdate, User, UserCreate, UserUpdate,
};

// ============================================================================
// Capabilities
// ============================================================================

/// An endpoint family under the API base URL
pub trait Resource: Send + Sync + 'static {
    /// Human-readable name used in default failure messages
    const NAME: &'static str;

    /// Path segment, without leading slash (`load` → `/api/load`)
    const PATH: &'static str;

    /// Read model returned by the server
    type Item: DeserializeOwned + Send + 'static;

    /// `{PATH}/{id}`, the id encoded as a single segment
    fn item_path(id: &str) -> Result<String, FieldErrors> {
        Ok(format!("{}/{}", Self::PATH, path_segment(id)?))
    }
}

/// Percent-encode an id so it stays one path segment
///
/// Empty and dot-segment ids are refused: they would address the
/// collection or its parent instead of a record.
pub fn path_segment(id: &str) -> Result<Cow<'_, str>, FieldErrors> {
    if id.trim().is_empty() || id == "." || id == ".." {
        let mut errors = FieldErrors::default();
        errors.push(FieldError::new("id", "invalid", "id must name a single record"));
        return Err(errors);
    }
    Ok(urlencoding::encode(id))
}

/// `GET /{path}?{query}`
pub trait Listable: Resource {}

/// `GET /{path}/{id}`
pub trait Readable: Resource {}

/// `POST /{path}`
pub trait Creatable: Resource {
    type Create: FormSchema + Send + Sync;
}

/// `PUT /{path}/{id}`
pub trait Updatable: Resource {
    type Update: FormSchema + Send + Sync;
}

/// `DELETE /{path}/{id}`
pub trait Removable: Resource {}

// ============================================================================
// Markers
// ============================================================================

/// Declare a marker with the full CRUD set
macro_rules! crud_resource {
    ($(#[$doc:meta])* $marker:ident, $name:literal, $item:ty, $create:ty, $update:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $marker;

        impl Resource for $marker {
            const NAME: &'static str = $name;
            const PATH: &'static str = $name;
            type Item = $item;
        }

        impl Listable for $marker {}
        impl Readable for $marker {}
        impl Removable for $marker {}

        impl Creatable for $marker {
            type Create = $create;
        }

        impl Updatable for $marker {
            type Update = $update;
        }
    };
}

crud_resource!(
    /// Freight loads (`/load`)
    Loads, "load", Load, LoadCreate, LoadUpdate
);
crud_resource!(
    /// Public quote requests (`/quote`)
    Quotes, "quote", Quote, QuoteCreate, QuoteUpdate
);
crud_resource!(
    /// Permission roles (`/role`)
    Roles, "role", Role, RoleCreate, RoleUpdate
);
crud_resource!(
    /// Users of every role; filter with `role=` (`/user`)
    Users, "user", User, UserCreate, UserUpdate
);
crud_resource!(
    /// Pickup facilities (`/shipper`)
    Shippers, "shipper", Facility, FacilityCreate, FacilityUpdate
);
crud_resource!(
    /// Delivery facilities (`/consignee`)
    Consignees, "consignee", Facility, FacilityCreate, FacilityUpdate
);
