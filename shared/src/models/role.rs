//! Role Model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::schema::{FormSchema, blank_as_none, null_as_empty};

/// Role entity (RBAC 角色)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Permission strings (e.g. ["*"], ["loads:read", "quotes:write"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Role {
    /// `*` grants everything; `loads:*` grants every action on loads
    pub fn allows(&self, permission: &str) -> bool {
        self.permissions.iter().flatten().any(|granted| {
            granted == "*"
                || granted == permission
                || granted
                    .strip_suffix(":*")
                    .is_some_and(|scope| permission.split(':').next() == Some(scope))
        })
    }
}

/// Create role payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleCreate {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub is_active: bool,
}

impl Default for RoleCreate {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            permissions: Vec::new(),
            is_active: true,
        }
    }
}

impl FormSchema for RoleCreate {}

/// Update role payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleUpdate {
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl FormSchema for RoleUpdate {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn role(permissions: &[&str]) -> Role {
        Role {
            id: "r1".into(),
            name: Some("dispatcher".into()),
            permissions: Some(permissions.iter().map(|p| p.to_string()).collect()),
            is_active: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn test_permission_matching() {
        assert!(role(&["*"]).allows("loads:delete"));
        assert!(role(&["loads:*"]).allows("loads:delete"));
        assert!(!role(&["loads:*"]).allows("quotes:read"));
        assert!(role(&["quotes:read"]).allows("quotes:read"));
        assert!(!role(&[]).allows("quotes:read"));

        let bare: Role = serde_json::from_value(json!({"_id": "r2"})).unwrap();
        assert!(!bare.allows("quotes:read"));
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"_id": "r2"}));
    }

    #[test]
    fn test_create_defaults_to_active() {
        let create = RoleCreate::from_form(json!({"name": "Dispatcher"})).unwrap();
        assert!(create.is_active);
        assert_eq!(
            create.to_payload().unwrap(),
            json!({"name": "Dispatcher", "permissions": [], "isActive": true})
        );
    }
}
