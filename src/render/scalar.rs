//! Scalar and flow-style value formatting.

use regex::Regex;
use std::sync::LazyLock;

use crate::settings::SettingsValue;

/// Strings of bare digits would read back as integers.
static BARE_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("Invalid regex for bare integers"));

/// Collector durations such as `200ms`, `1.5s` or `10m`.
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(\.[0-9]+)?(ms|s|m|h)$").expect("Invalid regex for durations")
});

const QUOTE_TRIGGERS: &[char] = &[':', ' ', '#', '*', '/', '{', '}'];

/// Format a string scalar, double-quoting it when it would otherwise be
/// misread. Durations are always emitted bare. No escaping is applied.
pub fn format_string(s: &str) -> String {
    if DURATION.is_match(s) {
        return s.to_string();
    }
    if s.is_empty() || BARE_INTEGER.is_match(s) || s.contains(QUOTE_TRIGGERS) {
        return format!("\"{s}\"");
    }
    s.to_string()
}

/// Format a value for use after `key: ` or `- `.
///
/// Arrays and maps use flow style (`[a, b]`, `{k: v}`), nesting as needed.
pub fn format_value(value: &SettingsValue) -> String {
    match value {
        SettingsValue::Null => "null".to_string(),
        SettingsValue::Bool(b) => b.to_string(),
        SettingsValue::Number(n) => n.to_string(),
        SettingsValue::String(s) => format_string(s),
        SettingsValue::Array(items) => {
            let parts: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", parts.join(", "))
        }
        SettingsValue::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, format_value(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}
