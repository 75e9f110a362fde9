//! YAML and JSON data handling utilities.

use seedling_types::{SeedlingError, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Load YAML from string.
pub fn load_yaml(content: &str) -> Result<Value> {
    serde_yaml::from_str(content).map_err(SeedlingError::Yaml)
}

/// Deep merge two values.
/// Recursively merges objects, with overlay values taking precedence.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                match base_map.remove(&key) {
                    Some(base_val) => {
                        base_map.insert(key, deep_merge(base_val, overlay_val));
                    }
                    None => {
                        base_map.insert(key, overlay_val);
                    }
                }
            }
            Value::Object(base_map)
        }
        (_, overlay_val) => overlay_val,
    }
}

/// Get value at a path in dotted notation.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;

    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            Value::Array(arr) => {
                let index: usize = part.parse().ok()?;
                current = arr.get(index)?;
            }
            _ => return None,
        }
    }

    Some(current)
}

/// Deserialize a `u32` from either a number or a numeric string.
///
/// Environment overrides always arrive as strings.
pub fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected a whole number, got '{}'", s))),
    }
}
