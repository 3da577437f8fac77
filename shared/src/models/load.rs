//! Load Model (货运单)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use super::location::Location;
use crate::schema::{FormSchema, blank_as_none, lenient_f64, null_as_empty};

/// Load lifecycle status
///
/// Statuses added on the server after this client was built decode as
/// [`LoadStatus::Other`] and serialize back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadStatus {
    #[default]
    Pending,
    Posted,
    Requested,
    Assigned,
    InTransit,
    Delivered,
    Cancelled,
    #[serde(untagged)]
    Other(String),
}

impl LoadStatus {
    pub const ALL: [LoadStatus; 7] = [
        Self::Pending,
        Self::Posted,
        Self::Requested,
        Self::Assigned,
        Self::InTransit,
        Self::Delivered,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Posted => "posted",
            Self::Requested => "requested",
            Self::Assigned => "assigned",
            Self::InTransit => "in-transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Other(raw) => raw,
        }
    }

    /// Delivered and cancelled loads accept no further status changes
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Only the known statuses are accepted from user input
impl FromStr for LoadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown load status: {s}"))
    }
}

/// Load entity
///
/// Every field is optional and unknown fields are kept in `extra`, so a
/// record re-serializes to what the server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipper_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consignee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Location>,
    /// Pickup date (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_date: Option<String>,
    /// Delivery date (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commodity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LoadStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Minutes since the load was posted; maintained by `refresh-age`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Create load payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "validate_create_dates"))]
pub struct LoadCreate {
    #[serde(deserialize_with = "blank_as_none")]
    pub load_number: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub broker_id: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub customer_id: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub shipper_id: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub consignee_id: Option<String>,
    #[validate(nested)]
    pub origin: Location,
    #[validate(nested)]
    pub destination: Location,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(custom(function = "validate_date"))]
    pub pickup_date: String,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_date"))]
    pub delivery_date: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "equipmentType is required"))]
    pub equipment_type: String,
    #[serde(deserialize_with = "lenient_f64")]
    #[validate(range(min = 0.0, message = "weight must not be negative"))]
    pub weight: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub commodity: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    #[validate(range(min = 0.0, message = "rate must not be negative"))]
    pub rate: Option<f64>,
    pub status: LoadStatus,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl FormSchema for LoadCreate {}

/// Update load payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "validate_update_dates"))]
pub struct LoadUpdate {
    #[serde(deserialize_with = "blank_as_none")]
    pub carrier_id: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub customer_id: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub shipper_id: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub consignee_id: Option<String>,
    #[validate(nested)]
    pub origin: Option<Location>,
    #[validate(nested)]
    pub destination: Option<Location>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_date"))]
    pub pickup_date: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_date"))]
    pub delivery_date: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub equipment_type: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    #[validate(range(min = 0.0, message = "weight must not be negative"))]
    pub weight: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub commodity: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    #[validate(range(min = 0.0, message = "rate must not be negative"))]
    pub rate: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl FormSchema for LoadUpdate {}

/// `PUT /load/{id}/status` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadStatusUpdate {
    pub status: LoadStatus,
}

/// `POST /load/create-alert` body: notify when matching loads are posted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadAlert {
    #[validate(nested)]
    pub origin: Location,
    #[validate(nested)]
    pub destination: Option<Location>,
    #[serde(deserialize_with = "blank_as_none")]
    pub equipment_type: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    #[validate(range(min = 1.0, max = 500.0, message = "radiusMiles must be between 1 and 500"))]
    pub radius_miles: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(email)]
    pub email: Option<String>,
}

impl FormSchema for LoadAlert {}

/// Dates arrive from date pickers as `YYYY-MM-DD` or full RFC 3339
pub(crate) fn parse_date(value: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

pub(crate) fn validate_date(value: &str) -> Result<(), ValidationError> {
    if parse_date(value).is_some() {
        return Ok(());
    }
    let mut error = ValidationError::new("date");
    error.message = Some(if value.is_empty() {
        "date is required".into()
    } else {
        format!("{value} is not a valid date").into()
    });
    Err(error)
}

fn check_order(pickup: Option<&str>, delivery: Option<&str>) -> Result<(), ValidationError> {
    let (Some(pickup), Some(delivery)) = (pickup.and_then(parse_date), delivery.and_then(parse_date))
    else {
        return Ok(());
    };
    if delivery < pickup {
        let mut error = ValidationError::new("date_order");
        error.message = Some("deliveryDate must not be before pickupDate".into());
        return Err(error);
    }
    Ok(())
}

fn validate_create_dates(load: &LoadCreate) -> Result<(), ValidationError> {
    check_order(Some(&load.pickup_date), load.delivery_date.as_deref())
}

fn validate_update_dates(load: &LoadUpdate) -> Result<(), ValidationError> {
    check_order(load.pickup_date.as_deref(), load.delivery_date.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_create() -> LoadCreate {
        LoadCreate {
            origin: Location::new("Dallas", "TX"),
            destination: Location::new("Atlanta", "GA"),
            pickup_date: "2026-11-02".into(),
            equipment_type: "Dry Van".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(LoadStatus::InTransit).unwrap(), json!("in-transit"));
        assert_eq!("IN-TRANSIT".parse::<LoadStatus>(), Ok(LoadStatus::InTransit));
        assert!("lost".parse::<LoadStatus>().is_err());
        let lost: LoadStatus = serde_json::from_value(json!("lost")).unwrap();
        assert_eq!(lost.as_str(), "lost");
        assert!(LoadStatus::Delivered.is_terminal());
        assert!(!LoadStatus::Posted.is_terminal());
    }

    #[test]
    fn test_create_payload_is_stripped() {
        let payload = valid_create().to_payload().unwrap();
        let object = payload.as_object().unwrap();
        assert!(!object.contains_key("brokerId"));
        assert!(!object.contains_key("deliveryDate"));
        assert_eq!(object["status"], json!("pending"));
        assert_eq!(payload["origin"], json!({"city": "Dallas", "state": "TX"}));
    }

    #[test]
    fn test_create_from_empty_form_reports_required_fields() {
        let errors = LoadCreate::from_form(json!({})).unwrap().check().unwrap_err();
        assert!(errors.contains("pickupDate"));
        assert!(errors.contains("equipmentType"));
        assert!(errors.contains("origin.city"));
        assert!(errors.contains("destination.state"));
    }

    #[test]
    fn test_create_coerces_form_strings() {
        let load = LoadCreate::from_form(json!({
            "origin": {"city": "Dallas", "state": "TX"},
            "destination": {"city": "Atlanta", "state": "GA"},
            "pickupDate": "2026-11-02T08:00:00Z",
            "equipmentType": "Reefer",
            "weight": "38000",
            "rate": "",
            "brokerId": ""
        }))
        .unwrap();
        assert_eq!(load.weight, Some(38000.0));
        assert_eq!(load.rate, None);
        assert_eq!(load.broker_id, None);
        assert!(load.check().is_ok());
    }

    #[test]
    fn test_delivery_before_pickup_is_rejected() {
        let mut load = valid_create();
        load.delivery_date = Some("2026-11-01".into());
        let errors = load.check().unwrap_err();
        assert!(errors.contains("_form"));

        load.delivery_date = Some("2026-11-05".into());
        assert!(load.check().is_ok());
    }

    #[test]
    fn test_update_allows_empty_body() {
        let update = LoadUpdate::default();
        assert_eq!(update.to_payload().unwrap(), json!({}));

        let update = LoadUpdate {
            weight: Some(-1.0),
            ..Default::default()
        };
        assert!(update.check().unwrap_err().contains("weight"));
    }

    #[test]
    fn test_load_decodes_server_record() {
        let load: Load = serde_json::from_value(json!({
            "_id": "665f",
            "loadNumber": "LB-1001",
            "origin": {"city": "Dallas", "state": "TX"},
            "destination": {"city": "Atlanta", "state": "GA"},
            "status": "posted",
            "age": 12
        }))
        .unwrap();
        assert_eq!(load.id, "665f");
        assert_eq!(load.status, Some(LoadStatus::Posted));
        assert_eq!(load.age, Some(12));
        assert!(load.carrier_id.is_none());
    }

    #[test]
    fn test_load_tolerates_new_status_and_sparse_record() {
        let raw = json!({
            "_id": "665f",
            "status": "on-hold",
            "tracking": {"provider": "macropoint"}
        });
        let load: Load = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(load.status, Some(LoadStatus::Other("on-hold".into())));
        assert!(load.origin.is_none());
        assert_eq!(serde_json::to_value(&load).unwrap(), raw);
    }

    #[test]
    fn test_alert_rules() {
        let alert = LoadAlert {
            origin: Location::new("Dallas", "TX"),
            radius_miles: Some(900.0),
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        let errors = alert.check().unwrap_err();
        assert!(errors.contains("radiusMiles"));
        assert!(errors.contains("email"));
    }
}
