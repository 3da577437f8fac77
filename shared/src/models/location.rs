//! Location Model (pickup / drop-off addresses)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::schema::{blank_as_none, lenient_f64};

/// Postal address with optional coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    #[serde(deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[validate(length(min = 2, max = 2, message = "state must be a 2-letter code"))]
    pub state: String,
    #[serde(deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_latitude"))]
    pub lat: Option<f64>,
    #[serde(deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_longitude"))]
    pub lng: Option<f64>,
    /// Fields this client does not model (country, geohash, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
            ..Default::default()
        }
    }

    /// `City, ST` label used in lists and alerts
    pub fn label(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }

    /// Coordinates when both are known
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lng)
    }
}

fn validate_latitude(value: f64) -> Result<(), ValidationError> {
    check_bound(value, 90.0, "lat must be between -90 and 90")
}

fn validate_longitude(value: f64) -> Result<(), ValidationError> {
    check_bound(value, 180.0, "lng must be between -180 and 180")
}

fn check_bound(value: f64, bound: f64, message: &'static str) -> Result<(), ValidationError> {
    if value.is_finite() && value.abs() <= bound {
        return Ok(());
    }
    Err(ValidationError::new("range").with_message(message.into()))
}
