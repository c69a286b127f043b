//! Dot-separated path access into settings trees.
//!
//! A path such as `config.scrape_configs.0.job_name` is split on `.`. On an
//! array node a segment must be a non-negative integer index; on a map node
//! every segment, numeric or not, is a key.

use serde_json::{Map, Value};

use super::{kind_name, SettingsValue};
use crate::error::PathError;

/// Parse a segment as an array index. Only plain ASCII digits qualify.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Read the value at `path`.
///
/// Returns `None` as soon as an intermediate node is missing or has the
/// wrong shape. Never fails loudly.
pub fn get<'a>(root: &'a SettingsValue, path: &str) -> Option<&'a SettingsValue> {
    path.split('.').try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|index| items.get(index)),
        _ => None,
    })
}

/// Write `value` at `path`, creating missing intermediate containers.
///
/// A missing (or null) intermediate becomes an array when the following
/// segment is an index, otherwise a map. Existing nodes of the wrong shape
/// are never coerced: descending through a scalar, using a key on an array,
/// or skipping past the end of an array is an error. The whole path is
/// checked before anything is created, so a failed call leaves the tree
/// untouched.
///
/// # Errors
///
/// Returns a [`PathError`] describing the first incompatible segment.
pub fn set(root: &mut SettingsValue, path: &str, value: SettingsValue) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let segments: Vec<&str> = path.split('.').collect();
    check_path(root, path, &segments)?;

    let last = segments.len() - 1;
    let mut current = root;

    for (position, segment) in segments[..last].iter().enumerate() {
        let next_is_index = parse_index(segments[position + 1]).is_some();
        current = descend(current, path, segment, next_is_index)?;
    }

    let slot = slot_mut(current, path, segments[last])?;
    *slot = value;
    Ok(())
}

/// Remove the entry at `path`, returning it if it existed.
///
/// Map entries are removed without disturbing the order of their siblings;
/// array items shift down.
pub fn remove(root: &mut SettingsValue, path: &str) -> Option<SettingsValue> {
    let (parent_path, key) = match path.rsplit_once('.') {
        Some((parent, key)) => (Some(parent), key),
        None => (None, path),
    };

    let parent = match parent_path {
        Some(parent) => get_mut(root, parent)?,
        None => root,
    };

    match parent {
        Value::Object(map) => map.shift_remove(key),
        Value::Array(items) => {
            let index = parse_index(key)?;
            (index < items.len()).then(|| items.remove(index))
        }
        _ => None,
    }
}

fn get_mut<'a>(root: &'a mut SettingsValue, path: &str) -> Option<&'a mut SettingsValue> {
    path.split('.').try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => parse_index(segment).and_then(move |index| items.get_mut(index)),
        _ => None,
    })
}

/// Report the error `set` would hit on `segments`, without writing.
fn check_path(root: &SettingsValue, path: &str, segments: &[&str]) -> Result<(), PathError> {
    let mut node = root;
    let mut reached_by: Option<&str> = None;

    for (position, &segment) in segments.iter().enumerate() {
        let slot = match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => {
                let index = parse_index(segment).ok_or_else(|| PathError::ExpectedIndex {
                    path: path.to_string(),
                    segment: segment.to_string(),
                })?;
                if index > items.len() {
                    return Err(PathError::IndexOutOfRange {
                        path: path.to_string(),
                        index,
                        len: items.len(),
                    });
                }
                items.get(index)
            }
            other => {
                return Err(PathError::NotAContainer {
                    path: path.to_string(),
                    segment: reached_by.unwrap_or(segment).to_string(),
                    found: kind_name(other),
                })
            }
        };

        match slot {
            Some(next) if !next.is_null() => {
                node = next;
                reached_by = Some(segment);
            }
            _ => return check_fresh(path, &segments[position + 1..]),
        }
    }
    Ok(())
}

/// Below a missing node every container is new, and a new array only
/// accepts index 0.
fn check_fresh(path: &str, segments: &[&str]) -> Result<(), PathError> {
    match segments.iter().find_map(|s| parse_index(s).filter(|&i| i > 0)) {
        Some(index) => Err(PathError::IndexOutOfRange {
            path: path.to_string(),
            index,
            len: 0,
        }),
        None => Ok(()),
    }
}

fn empty_container(as_array: bool) -> SettingsValue {
    if as_array {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

/// Step into `segment`, vivifying it if absent.
fn descend<'a>(
    node: &'a mut SettingsValue,
    path: &str,
    segment: &str,
    next_is_index: bool,
) -> Result<&'a mut SettingsValue, PathError> {
    let slot = slot_mut(node, path, segment)?;
    if slot.is_null() {
        *slot = empty_container(next_is_index);
    }

    if matches!(slot, Value::Array(_) | Value::Object(_)) {
        return Ok(slot);
    }
    Err(PathError::NotAContainer {
        path: path.to_string(),
        segment: segment.to_string(),
        found: kind_name(slot),
    })
}

/// Locate the slot named by `segment` inside `node`, creating it as null if
/// it does not exist yet.
fn slot_mut<'a>(
    node: &'a mut SettingsValue,
    path: &str,
    segment: &str,
) -> Result<&'a mut SettingsValue, PathError> {
    match node {
        Value::Object(map) => Ok(map.entry(segment).or_insert(Value::Null)),
        Value::Array(items) => {
            let index = parse_index(segment).ok_or_else(|| PathError::ExpectedIndex {
                path: path.to_string(),
                segment: segment.to_string(),
            })?;
            if index > items.len() {
                return Err(PathError::IndexOutOfRange {
                    path: path.to_string(),
                    index,
                    len: items.len(),
                });
            }
            if index == items.len() {
                items.push(Value::Null);
            }
            Ok(&mut items[index])
        }
        other => Err(PathError::NotAContainer {
            path: path.to_string(),
            segment: segment.to_string(),
            found: kind_name(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prometheus_settings() -> SettingsValue {
        json!({
            "config": {
                "scrape_configs": [{
                    "job_name": "otel-collector",
                    "scrape_interval": "10s",
                    "static_configs": [{ "targets": ["localhost:8888"] }]
                }]
            }
        })
    }

    #[test]
    fn test_get_nested_map_and_array() {
        let settings = prometheus_settings();
        assert_eq!(
            get(&settings, "config.scrape_configs.0.job_name"),
            Some(&json!("otel-collector"))
        );
        assert_eq!(
            get(&settings, "config.scrape_configs.0.static_configs.0.targets.0"),
            Some(&json!("localhost:8888"))
        );
    }

    #[test]
    fn test_get_missing_or_mismatched_is_none() {
        let settings = prometheus_settings();
        assert_eq!(get(&settings, "config.missing.deeper"), None);
        assert_eq!(get(&settings, "config.scrape_configs.job_name"), None);
        assert_eq!(get(&settings, "config.scrape_configs.7"), None);
        assert_eq!(get(&settings, "config.scrape_configs.0.job_name.x"), None);
    }

    #[test]
    fn test_get_numeric_segment_on_map_is_a_key() {
        let settings = json!({ "codes": { "200": "ok" } });
        assert_eq!(get(&settings, "codes.200"), Some(&json!("ok")));
    }

    #[test]
    fn test_set_overwrites_existing_leaf() {
        let mut settings = json!({ "protocols": { "grpc": { "endpoint": "0.0.0.0:4317" } } });
        set(&mut settings, "protocols.grpc.endpoint", json!("0.0.0.0:5317")).unwrap();
        assert_eq!(
            settings,
            json!({ "protocols": { "grpc": { "endpoint": "0.0.0.0:5317" } } })
        );
    }

    #[test]
    fn test_set_vivifies_maps_and_arrays() {
        let mut settings = json!({});
        set(&mut settings, "actions.0.key", json!("env")).unwrap();
        set(&mut settings, "tls.insecure", json!(true)).unwrap();
        assert_eq!(
            settings,
            json!({ "actions": [{ "key": "env" }], "tls": { "insecure": true } })
        );
    }

    #[test]
    fn test_set_appends_at_array_end() {
        let mut settings = json!({ "include": ["/var/log/a.log"] });
        set(&mut settings, "include.1", json!("/var/log/b.log")).unwrap();
        assert_eq!(
            settings,
            json!({ "include": ["/var/log/a.log", "/var/log/b.log"] })
        );
    }

    #[test]
    fn test_set_replaces_null_intermediate() {
        let mut settings = json!({ "traces": null });
        set(&mut settings, "traces.span", json!("IsRootSpan()")).unwrap();
        assert_eq!(settings, json!({ "traces": { "span": "IsRootSpan()" } }));
    }

    #[test]
    fn test_set_through_scalar_is_an_error() {
        let mut settings = json!({ "tls": true });
        let err = set(&mut settings, "tls.insecure", json!(false)).unwrap_err();
        assert_eq!(
            err,
            PathError::NotAContainer {
                path: "tls.insecure".to_string(),
                segment: "tls".to_string(),
                found: "boolean",
            }
        );
        assert_eq!(settings, json!({ "tls": true }));
    }

    #[test]
    fn test_set_key_on_array_is_an_error() {
        let mut settings = json!({ "include": [] });
        let err = set(&mut settings, "include.first", json!("x")).unwrap_err();
        assert!(matches!(err, PathError::ExpectedIndex { ref segment, .. } if segment == "first"));
    }

    #[test]
    fn test_set_past_array_end_is_an_error() {
        let mut settings = json!({ "include": [] });
        let err = set(&mut settings, "include.3", json!("x")).unwrap_err();
        assert_eq!(
            err,
            PathError::IndexOutOfRange {
                path: "include.3".to_string(),
                index: 3,
                len: 0,
            }
        );
    }

    #[test]
    fn test_failed_set_creates_nothing() {
        let mut settings = json!({ "timeout": "5s" });
        let err = set(&mut settings, "include.3", json!("x")).unwrap_err();
        assert!(matches!(err, PathError::IndexOutOfRange { index: 3, len: 0, .. }));
        assert_eq!(settings, json!({ "timeout": "5s" }));

        let mut settings = json!({});
        let err = set(&mut settings, "a.0.2", json!(1)).unwrap_err();
        assert_eq!(
            err,
            PathError::IndexOutOfRange {
                path: "a.0.2".to_string(),
                index: 2,
                len: 0,
            }
        );
        assert_eq!(settings, json!({}));
    }

    #[test]
    fn test_failed_set_below_null_keeps_null() {
        let mut settings = json!({ "traces": null });
        assert!(set(&mut settings, "traces.1", json!("x")).is_err());
        assert_eq!(settings, json!({ "traces": null }));
    }

    #[test]
    fn test_failed_set_deep_in_existing_tree() {
        let mut settings = prometheus_settings();
        let err = set(
            &mut settings,
            "config.scrape_configs.0.static_configs.targets",
            json!(["localhost:9090"]),
        )
        .unwrap_err();
        assert!(matches!(err, PathError::ExpectedIndex { ref segment, .. } if segment == "targets"));
        assert_eq!(settings, prometheus_settings());

        let err = set(&mut settings, "config.scrape_configs.0.job_name.x", json!("x")).unwrap_err();
        assert_eq!(
            err,
            PathError::NotAContainer {
                path: "config.scrape_configs.0.job_name.x".to_string(),
                segment: "job_name".to_string(),
                found: "string",
            }
        );
        assert_eq!(settings, prometheus_settings());
    }

    #[test]
    fn test_set_on_scalar_root_is_an_error() {
        let mut settings = json!(5);
        let err = set(&mut settings, "a", json!(1)).unwrap_err();
        assert!(matches!(err, PathError::NotAContainer { ref segment, found: "number", .. } if segment == "a"));
        assert_eq!(settings, json!(5));
    }

    #[test]
    fn test_set_empty_path_is_an_error() {
        let mut settings = json!({});
        assert_eq!(set(&mut settings, "", json!(1)), Err(PathError::EmptyPath));
    }

    #[test]
    fn test_remove_keeps_sibling_order() {
        let mut settings = json!({ "scrapers": { "cpu": {}, "memory": {}, "disk": {} } });
        assert_eq!(remove(&mut settings, "scrapers.cpu"), Some(json!({})));
        let keys: Vec<&String> = settings["scrapers"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["memory", "disk"]);
        assert_eq!(remove(&mut settings, "scrapers.cpu"), None);
    }

    #[test]
    fn test_remove_array_item() {
        let mut settings = json!({ "detectors": ["env", "system"] });
        assert_eq!(remove(&mut settings, "detectors.0"), Some(json!("env")));
        assert_eq!(settings, json!({ "detectors": ["system"] }));
    }
}
