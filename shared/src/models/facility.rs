//! Facility Models (shippers and consignees)
//!
//! Shippers (pickup side) and consignees (delivery side) carry the same
//! fields; they only live under different endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::location::Location;
use crate::schema::{FormSchema, blank_as_none, null_as_empty};

/// Shipper or consignee record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Location>,
    /// Dock hours, appointment rules, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type Shipper = Facility;
pub type Consignee = Facility;

/// Create shipper/consignee payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct FacilityCreate {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub contact_name: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[validate(nested)]
    pub address: Location,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub is_active: bool,
}

impl Default for FacilityCreate {
    fn default() -> Self {
        Self {
            name: String::new(),
            contact_name: None,
            email: None,
            phone: None,
            address: Location::default(),
            notes: None,
            is_active: true,
        }
    }
}

impl FormSchema for FacilityCreate {}

/// Update shipper/consignee payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct FacilityUpdate {
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub contact_name: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[validate(nested)]
    pub address: Option<Location>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

impl FormSchema for FacilityUpdate {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_requires_name_and_address() {
        let errors = FacilityCreate::default().check().unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("address.city"));
    }

    #[test]
    fn test_update_validates_nested_address() {
        let update = FacilityUpdate {
            address: Some(Location::new("Reno", "Nevada")),
            ..Default::default()
        };
        assert!(update.check().unwrap_err().contains("address.state"));

        let update = FacilityUpdate {
            notes: Some("Dock 4, appointments only".into()),
            ..Default::default()
        };
        assert_eq!(
            update.to_payload().unwrap(),
            json!({"notes": "Dock 4, appointments only"})
        );
    }
}
