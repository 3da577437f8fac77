//! Quote Model (报价请求)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::schema::{FormSchema, blank_as_none, lenient_f64, null_as_empty};

use super::load::validate_date;

/// Quote workflow status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Quoted,
    Accepted,
    Rejected,
    #[serde(untagged)]
    Other(String),
}

/// Quote request submitted by a prospective customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-form origin (`City, ST`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Free-form destination (`City, ST`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commodity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_date: Option<String>,
    /// Price offered by the broker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<QuoteStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Create quote payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteCreate {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "origin is required"))]
    pub origin: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "destination is required"))]
    pub destination: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub commodity: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    #[validate(range(min = 0.0, message = "weight must not be negative"))]
    pub weight: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub equipment_type: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_date"))]
    pub pickup_date: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl FormSchema for QuoteCreate {}

/// Update quote payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteUpdate {
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub origin: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub destination: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    #[validate(range(min = 0.0, message = "quotedRate must not be negative"))]
    pub quoted_rate: Option<f64>,
    pub status: Option<QuoteStatus>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl FormSchema for QuoteUpdate {}
