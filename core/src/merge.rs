//! Recursive merging of configuration trees.
//!
//! Configuration arrives as loosely typed [`Value`] trees (from YAML or JSON
//! files, or built in code). [`merge_values`] layers one tree over another:
//! nested mappings are merged key by key and everything else is replaced.
//!
//! # Example
//!
//! ```
//! use cihai_core::merge_values;
//!
//! let base: serde_yaml::Value = serde_yaml::from_str("database: {url: 'sqlite://'}\ndebug: false").unwrap();
//! let overlay: serde_yaml::Value = serde_yaml::from_str("debug: true").unwrap();
//!
//! let merged = merge_values(&base, &overlay);
//! assert_eq!(merged["debug"], serde_yaml::Value::Bool(true));
//! assert_eq!(merged["database"]["url"], serde_yaml::Value::from("sqlite://"));
//! ```

use serde_yaml::{Mapping, Value};

/// Merges `overlay` on top of `base` and returns the combined tree.
///
/// - A null on either side yields the other side unchanged.
/// - Two mappings are merged recursively; overlay keys win.
/// - Any other combination returns `overlay`.
///
/// Neither input is modified.
pub fn merge_values(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (_, Value::Null) => base.clone(),
        (Value::Null, _) => overlay.clone(),
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            Value::Mapping(merge_mappings(base_map, overlay_map))
        }
        _ => overlay.clone(),
    }
}

fn merge_mappings(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut merged = base.clone();

    for (key, value) in overlay {
        let combined = match (merged.get(key), value) {
            (Some(existing), Value::Mapping(_)) => merge_values(existing, value),
            _ => value.clone(),
        };
        merged.insert(key.clone(), combined);
    }

    merged
}
