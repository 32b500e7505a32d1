//! Dotted-path lookup over nested mappings

use std::path::Path;

use crate::value::{ConfigMapping, ConfigValue};

/// Get a value by dot-separated path.
///
/// Returns `None` as soon as a segment is missing or an intermediate value
/// is not a table; the two cases are not distinguished.
pub fn deep_get<'a>(mapping: &'a ConfigMapping, keys: &str) -> Option<&'a ConfigValue> {
    let mut segments = keys.split('.');
    let mut current = mapping.get(segments.next()?)?;
    for segment in segments {
        current = current.as_table()?.get(segment)?;
    }
    Some(current)
}

/// Like [`deep_get`], falling back to `default`
///
/// ```
/// use tomlconfig::{deep_get_or, ConfigValue};
///
/// let doc: toml::Table = toml::from_str("[k1.k2]\nk3 = \"hello\"").unwrap();
/// let map = tomlconfig::value::from_toml_table(doc);
/// let fallback = ConfigValue::from("goodbye");
///
/// assert_eq!(deep_get_or(&map, "k1.k2.k3", &fallback).as_str(), Some("hello"));
/// assert_eq!(deep_get_or(&map, "k1.k9", &fallback).as_str(), Some("goodbye"));
/// ```
pub fn deep_get_or<'a>(
    mapping: &'a ConfigMapping,
    keys: &str,
    default: &'a ConfigValue,
) -> &'a ConfigValue {
    deep_get(mapping, keys).unwrap_or(default)
}

/// Typed read access to a merged configuration
pub trait ConfigQuery {
    /// Get a config value by path (dot-separated)
    fn lookup(&self, path: &str) -> Option<&ConfigValue>;

    fn get_str(&self, path: &str) -> Option<&str> {
        self.lookup(path).and_then(|v| v.as_str())
    }

    fn get_i64(&self, path: &str) -> Option<i64> {
        self.lookup(path).and_then(|v| v.as_integer())
    }

    fn get_f64(&self, path: &str) -> Option<f64> {
        self.lookup(path).and_then(|v| v.as_float())
    }

    fn get_bool(&self, path: &str) -> Option<bool> {
        self.lookup(path).and_then(|v| v.as_bool())
    }

    /// Path value at `path`. Unconverted strings are viewed as paths too.
    fn get_path(&self, path: &str) -> Option<&Path> {
        match self.lookup(path)? {
            ConfigValue::Path(p) => Some(p.as_path()),
            ConfigValue::String(s) => Some(Path::new(s)),
            _ => None,
        }
    }

    fn get_array(&self, path: &str) -> Option<&[ConfigValue]> {
        self.lookup(path).and_then(|v| v.as_array())
    }

    fn get_table(&self, path: &str) -> Option<&ConfigMapping> {
        self.lookup(path).and_then(|v| v.as_table())
    }
}

impl ConfigQuery for ConfigMapping {
    fn lookup(&self, path: &str) -> Option<&ConfigValue> {
        deep_get(self, path)
    }
}
