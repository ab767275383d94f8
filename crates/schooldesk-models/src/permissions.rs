//! Permission sets, sidebar descriptors and the "my permissions" response.

use schooldesk_core::serde::deserialize_null_default;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of permission codes granted to the current identity.
///
/// Codes are opaque strings. Duplicates collapse on construction and order is
/// not significant. A set is always replaced wholesale on refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// One navigable module the current identity may see.
///
/// Only `module` takes part in access decisions. The remaining fields are
/// display metadata passed through to the navigation as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarItem {
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SidebarItem {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            label: None,
            path: None,
            icon: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Body of the backend's "my permissions" endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionsResponse {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub permissions: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub sidebar: Vec<SidebarItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_set_deduplicates() {
        let set: PermissionSet = ["fees.view", "fees.view", "reports.view"]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains("fees.view"));
        assert!(set.contains("reports.view"));
        assert!(!set.contains("users.view"));
    }

    #[test]
    fn test_permission_set_serializes_as_sequence() {
        let set: PermissionSet = ["b", "a"].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn test_sidebar_item_keeps_extra_metadata() {
        let json = r#"{"module": "fees", "label": "Fees", "badge": 3}"#;
        let item: SidebarItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.module, "fees");
        assert_eq!(item.label.as_deref(), Some("Fees"));
        assert_eq!(item.extra.get("badge"), Some(&serde_json::json!(3)));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["badge"], 3);
    }

    #[test]
    fn test_response_tolerates_null_sidebar() {
        let json = r#"{"permissions": ["a"], "sidebar": null}"#;
        let response: PermissionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.permissions, vec!["a".to_string()]);
        assert!(response.sidebar.is_empty());
    }
}
