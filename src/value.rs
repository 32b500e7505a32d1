//! Configuration value model
//!
//! A parsed document is a tree of [`ConfigValue`]s rooted at a
//! [`ConfigMapping`]. Every recursive operation in this crate pattern-matches
//! on the variant tag instead of inspecting types at runtime.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use toml::value::Datetime;

/// Mapping from key to value, ordered by key for deterministic iteration.
pub type ConfigMapping = BTreeMap<String, ConfigValue>;

/// A single configuration value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// TOML date/time literal, kept as written
    Datetime(Datetime),
    /// Filesystem path produced by prefix conversion
    Path(PathBuf),
    /// Only reachable from in-memory mappings; TOML has no null
    Null,
    Array(Vec<ConfigValue>),
    Table(ConfigMapping),
}

impl ConfigValue {
    /// Short name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::Datetime(_) => "datetime",
            Self::Path(_) => "path",
            Self::Null => "null",
            Self::Array(_) => "array",
            Self::Table(_) => "table",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Float value; integers are widened
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&Datetime> {
        match self {
            Self::Datetime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&ConfigMapping> {
        match self {
            Self::Table(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut ConfigMapping> {
        match self {
            Self::Table(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{:?}", s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Datetime(dt) => write!(f, "{}", dt),
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Null => write!(f, "null"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Self::Table(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Convert a parsed TOML table into a mapping
pub fn from_toml_table(table: toml::Table) -> ConfigMapping {
    table
        .into_iter()
        .map(|(k, v)| (k, ConfigValue::from(v)))
        .collect()
}

impl From<toml::Value> for ConfigValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Self::String(s),
            toml::Value::Integer(i) => Self::Integer(i),
            toml::Value::Float(f) => Self::Float(f),
            toml::Value::Boolean(b) => Self::Boolean(b),
            toml::Value::Datetime(dt) => Self::Datetime(dt),
            toml::Value::Array(arr) => Self::Array(arr.into_iter().map(Self::from).collect()),
            toml::Value::Table(table) => Self::Table(from_toml_table(table)),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<PathBuf> for ConfigValue {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        Self::Array(items)
    }
}

impl From<ConfigMapping> for ConfigValue {
    fn from(map: ConfigMapping) -> Self {
        Self::Table(map)
    }
}
