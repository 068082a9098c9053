// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Neight Contributors

//! On-load normalization of raw settings JSON.
//!
//! Records written by early releases used different key names and a nested
//! `window_size` object; both shapes are rewritten here before
//! deserialization. Fields whose JSON type does not match the schema are
//! dropped so that serde substitutes the per-field default instead of
//! rejecting the whole record.

use serde_json::Value;
use tracing::warn;

/// Key renames applied to records written by early releases.
const RENAMED_KEYS: &[(&str, &str)] = &[
    ("last_opened_file", "last_file"),
    ("default_directory", "last_directory"),
    ("autosave_interval", "autosave_interval_minutes"),
];

pub(super) fn migrate_on_load(value: Value) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };

    for (old, new) in RENAMED_KEYS {
        match map.remove(*old) {
            Some(v) if !map.contains_key(*new) => {
                map.insert((*new).to_string(), v);
            }
            // current key already present, the stale one is discarded
            _ => {}
        }
    }

    // Early releases nested the geometry as {"window_size": {"width", "height"}}.
    if let Some(Value::Object(size)) = map.remove("window_size") {
        for (nested, flat) in [("width", "window_width"), ("height", "window_height")] {
            if !map.contains_key(flat) {
                if let Some(v) = size.get(nested) {
                    map.insert(flat.to_string(), v.clone());
                }
            }
        }
    }

    Value::Object(map)
}

fn is_string_or_null(v: &Value) -> bool {
    v.is_string() || v.is_null()
}

fn is_string(v: &Value) -> bool {
    v.is_string()
}

fn is_bool(v: &Value) -> bool {
    v.is_boolean()
}

fn is_u32(v: &Value) -> bool {
    matches!(v.as_u64(), Some(n) if n <= u64::from(u32::MAX))
}

/// Expected JSON shape per recognized key.
const FIELD_SHAPES: &[(&str, fn(&Value) -> bool)] = &[
    ("last_file", is_string_or_null),
    ("font_family", is_string),
    ("font_size", is_u32),
    ("word_wrap", is_bool),
    ("window_width", is_u32),
    ("window_height", is_u32),
    ("window_maximized", is_bool),
    ("autosave_interval_minutes", is_u32),
    ("last_directory", is_string_or_null),
];

/// Drop recognized keys whose values have the wrong JSON type.
///
/// A malformed field must never reject the whole record; removing it lets
/// the per-field serde default apply.
pub(super) fn sanitize_fields(value: Value) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };
    for (key, shape_ok) in FIELD_SHAPES {
        if let Some(v) = map.get(*key) {
            if !shape_ok(v) {
                warn!("settings field '{key}' has an unexpected type; using the default");
                map.remove(*key);
            }
        }
    }
    Value::Object(map)
}

/// Deep-merge two JSON values.
/// `base` is existing file content, `overlay` is the serialized record.
/// Overlay values take priority; unknown keys in `base` survive.
pub(super) fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = if let Some(base_val) = base_map.remove(&key) {
                    deep_merge(base_val, overlay_val)
                } else {
                    overlay_val
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_base, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_migrate_renames_legacy_keys() {
        let value = json!({
            "last_opened_file": "/tmp/notes.txt",
            "default_directory": "/tmp",
            "autosave_interval": 15
        });
        let migrated = migrate_on_load(value);
        assert_eq!(migrated["last_file"], "/tmp/notes.txt");
        assert_eq!(migrated["last_directory"], "/tmp");
        assert_eq!(migrated["autosave_interval_minutes"], 15);
        assert!(migrated.get("last_opened_file").is_none());
        assert!(migrated.get("autosave_interval").is_none());
    }

    #[test]
    fn test_migrate_keeps_current_key_over_stale_one() {
        let value = json!({
            "last_file": "/tmp/current.txt",
            "last_opened_file": "/tmp/stale.txt"
        });
        let migrated = migrate_on_load(value);
        assert_eq!(migrated["last_file"], "/tmp/current.txt");
        assert!(migrated.get("last_opened_file").is_none());
    }

    #[test]
    fn test_migrate_flattens_window_size() {
        let value = json!({"window_size": {"width": 800, "height": 600}});
        let migrated = migrate_on_load(value);
        assert_eq!(migrated["window_width"], 800);
        assert_eq!(migrated["window_height"], 600);
        assert!(migrated.get("window_size").is_none());
    }

    #[test]
    fn test_migrate_passes_through_non_object() {
        assert_eq!(migrate_on_load(json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn test_sanitize_drops_wrong_types() {
        let value = json!({
            "font_size": "twelve",
            "word_wrap": "yes",
            "font_family": "Consolas"
        });
        let sanitized = sanitize_fields(value);
        assert!(sanitized.get("font_size").is_none());
        assert!(sanitized.get("word_wrap").is_none());
        assert_eq!(sanitized["font_family"], "Consolas");
    }

    #[test]
    fn test_sanitize_drops_out_of_range_integers() {
        let value = json!({"font_size": 10_000_000_000u64, "window_width": -5});
        let sanitized = sanitize_fields(value);
        assert!(sanitized.get("font_size").is_none());
        assert!(sanitized.get("window_width").is_none());
    }

    #[test]
    fn test_sanitize_keeps_unknown_keys() {
        let value = json!({"custom_plugin": {"x": 1}});
        let sanitized = sanitize_fields(value);
        assert_eq!(sanitized["custom_plugin"]["x"], 1);
    }

    #[test]
    fn test_deep_merge_overlay_wins() {
        let base = json!({"a": 1, "b": {"c": 2, "d": 3}});
        let overlay = json!({"b": {"c": 9}});
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"]["c"], 9);
        assert_eq!(merged["b"]["d"], 3);
    }

    #[test]
    fn test_deep_merge_replaces_mismatched_shapes() {
        let merged = deep_merge(json!({"a": 1}), json!(42));
        assert_eq!(merged, json!(42));
    }
}
