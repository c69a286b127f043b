//! Component settings trees.
//!
//! A settings tree is a JSON-shaped value: null, boolean, number, string,
//! array or map. Maps keep their insertion order (serde_json is built with
//! `preserve_order`), which is what makes rendering deterministic.
//!
//! This module provides:
//! - Addressed reads and writes into nested settings (`get`, `set`, `remove`)
//! - The settings cleaner that prunes empty scalars before rendering

mod cleaner;
mod path;

pub use cleaner::{clean, clean_settings};
pub use path::{get, remove, set};

/// A node in a settings tree.
pub type SettingsValue = serde_json::Value;

/// An insertion-ordered map of settings.
pub type SettingsMap = serde_json::Map<String, SettingsValue>;

/// Returns a short name for the shape of a settings value, used in errors.
pub fn kind_name(value: &SettingsValue) -> &'static str {
    match value {
        SettingsValue::Null => "null",
        SettingsValue::Bool(_) => "boolean",
        SettingsValue::Number(_) => "number",
        SettingsValue::String(_) => "string",
        SettingsValue::Array(_) => "array",
        SettingsValue::Object(_) => "map",
    }
}

/// Returns true for values that are neither arrays nor maps.
pub fn is_scalar(value: &SettingsValue) -> bool {
    !matches!(value, SettingsValue::Array(_) | SettingsValue::Object(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names() {
        assert_eq!(kind_name(&json!(null)), "null");
        assert_eq!(kind_name(&json!(true)), "boolean");
        assert_eq!(kind_name(&json!(8192)), "number");
        assert_eq!(kind_name(&json!("x")), "string");
        assert_eq!(kind_name(&json!([])), "array");
        assert_eq!(kind_name(&json!({})), "map");
    }

    #[test]
    fn test_map_preserves_insertion_order() {
        let value: SettingsValue =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }
}
