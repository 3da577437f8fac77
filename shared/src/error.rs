//! Field-level validation errors
//!
//! Form schemas report every failing field at once so the form layer can
//! mark them all, instead of stopping at the first problem.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// One failing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field path in wire naming (`origin.city`)
    pub field: String,
    /// Machine-readable rule name (`length`, `email`, `range`, ...)
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// All failing fields of one form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(transparent)]
#[error("{}", join_fields(.0))]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether `field` has at least one error
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }

    /// Error for a form body that could not be decoded at all
    pub fn malformed(message: impl Into<String>) -> Self {
        Self(vec![FieldError::new("_form", "malformed", message)])
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::default();
        flatten("", &errors, &mut out);
        // HashMap order is arbitrary; keep output stable for the form layer
        out.0.sort_by(|a, b| a.field.cmp(&b.field).then(a.code.cmp(&b.code)));
        out
    }
}

fn flatten(prefix: &str, errors: &ValidationErrors, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        // Struct-level rules are reported under `__all__`
        let name = if field == "__all__" {
            "_form".to_string()
        } else {
            to_camel_case(field)
        };
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}.{name}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| default_message(&path, &error.code));
                    out.push(FieldError::new(path.clone(), error.code.to_string(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

fn default_message(field: &str, code: &str) -> String {
    match code {
        "length" => format!("{field} must not be empty"),
        "email" => format!("{field} must be a valid email address"),
        "range" => format!("{field} is out of range"),
        "required" => format!("{field} is required"),
        other => format!("{field} is invalid ({other})"),
    }
}

/// Struct fields are snake_case; the form layer speaks the wire's camelCase
fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(to_camel_case("first_name"), "firstName");
        assert_eq!(to_camel_case("name"), "name");
        assert_eq!(to_camel_case("mc_number"), "mcNumber");
    }

    #[test]
    fn test_display_joins_fields() {
        let mut errors = FieldErrors::default();
        errors.push(FieldError::new("name", "length", "name must not be empty"));
        errors.push(FieldError::new("email", "email", "bad email"));
        assert_eq!(errors.to_string(), "name: name must not be empty; email: bad email");
        assert!(errors.contains("email"));
        assert!(!errors.contains("phone"));
    }
}
