//! Form schemas
//!
//! Every entity has a create shape (required fields enforced) and an update
//! shape (everything optional). Both go through [`FormSchema::to_payload`]
//! before they reach the wire: validate, serialize, then strip empty values.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::FieldErrors;

/// A validated, wire-ready form shape
pub trait FormSchema: Serialize + DeserializeOwned + Validate {
    /// Check every rule and report all failing fields
    fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }

    /// Validate and build the request body
    fn to_payload(&self) -> Result<Value, FieldErrors> {
        self.check()?;
        let value = serde_json::to_value(self)
            .map_err(|e| FieldErrors::malformed(format!("failed to encode form: {e}")))?;
        Ok(strip_empty(value))
    }

    /// Coerce raw form input into this shape
    fn from_form(input: Value) -> Result<Self, FieldErrors> {
        serde_json::from_value(input).map_err(|e| FieldErrors::malformed(e.to_string()))
    }
}

/// Remove `null` and `""` values from objects, recursively
///
/// Arrays keep their length; only objects nested inside them are cleaned.
pub fn strip_empty(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !is_empty_value(v))
                .map(|(k, v)| (k, strip_empty(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_empty).collect()),
        other => other,
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

// ── Coercion helpers (serde `deserialize_with`) ─────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Optional number that also accepts numeric strings; blank means `None`
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .replace(',', "")
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}

/// Optional string where blank input means `None`
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Required string; `null` means empty so the length rule reports it
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
