//! User Model
//!
//! Brokers, carriers and customers are all users; screens tell them apart
//! by filtering on `role`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::schema::{FormSchema, blank_as_none, null_as_empty};

/// Account role
///
/// Roles this client does not know (e.g. `dispatcher`) decode as
/// [`UserRole::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Broker,
    Carrier,
    #[default]
    Customer,
    #[serde(untagged)]
    Other(String),
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Broker => "broker",
            Self::Carrier => "carrier",
            Self::Customer => "customer",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "broker" => Ok(Self::Broker),
            "carrier" => Ok(Self::Carrier),
            "customer" => Ok(Self::Customer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// Owning broker for carriers and customers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_id: Option<String>,
    /// Motor-carrier number (carriers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mc_number: Option<String>,
    /// US DOT number (carriers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// First and last name, whichever are present
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Create user payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "validate_carrier_numbers"))]
pub struct UserCreate {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, max = 100, message = "firstName is required"))]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, max = 100, message = "lastName is required"))]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 8, max = 128, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub company: Option<String>,
    pub role: UserRole,
    #[serde(deserialize_with = "blank_as_none")]
    pub broker_id: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub mc_number: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub dot_number: Option<String>,
}

impl FormSchema for UserCreate {}

/// Update user payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UserUpdate {
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(min = 8, max = 128, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub company: Option<String>,
    pub role: Option<UserRole>,
    #[serde(deserialize_with = "blank_as_none")]
    pub broker_id: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub mc_number: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub dot_number: Option<String>,
    pub is_active: Option<bool>,
}

impl FormSchema for UserUpdate {}

/// Carriers must be identifiable by MC or DOT number
fn validate_carrier_numbers(user: &UserCreate) -> Result<(), ValidationError> {
    if user.role == UserRole::Carrier && user.mc_number.is_none() && user.dot_number.is_none() {
        return Err(ValidationError::new("carrier_number")
            .with_message("carriers need an mcNumber or dotNumber".into()));
    }
    Ok(())
}
