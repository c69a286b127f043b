//! Settings cleaning prior to rendering.
//!
//! Cleaning drops map entries whose value is null or the empty string. It
//! does not prune containers: a nested map survives even when it ends up
//! empty, because an empty map is meaningful to the collector (for example
//! `scrapers: { cpu: {} }` enables the cpu scraper). Arrays are kept as-is;
//! empty arrays are dropped later, at render time.

use serde_json::Value;

use super::{SettingsMap, SettingsValue};

/// Returns true for values the cleaner drops from a map.
fn is_blank(value: &SettingsValue) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Clean a settings value recursively.
///
/// Maps lose their blank entries (recursing into nested maps); every other
/// value is returned unchanged. Key order is preserved.
pub fn clean(value: &SettingsValue) -> SettingsValue {
    match value {
        Value::Object(map) => Value::Object(clean_map(map)),
        other => other.clone(),
    }
}

/// Clean a component's top-level settings.
///
/// Settings are always a map; anything else cleans to an empty map.
pub fn clean_settings(value: &SettingsValue) -> SettingsMap {
    match value {
        Value::Object(map) => clean_map(map),
        _ => SettingsMap::new(),
    }
}

fn clean_map(map: &SettingsMap) -> SettingsMap {
    map.iter()
        .filter(|(_, value)| !is_blank(value))
        .map(|(key, value)| (key.clone(), clean(value)))
        .collect()
}
