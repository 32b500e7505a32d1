//! Prefix-driven value conversion
//!
//! Keys whose name starts with a declared prefix have their values rewritten
//! by a converter. The control section is never rewritten.

use std::path::PathBuf;

use tracing::trace;

use super::CONTROL_SECTION;
use crate::error::{ConfigError, ConversionError, Result};
use crate::value::{ConfigMapping, ConfigValue};

/// Recursively replace values whose key starts with `prefix` by `convert(value)`.
///
/// Tables are descended into, never converted themselves. Any key equal to
/// [`CONTROL_SECTION`] is skipped with its whole subtree. The first failing
/// conversion aborts the pass; values converted before it stay converted.
pub fn prefix_convert<'a, F>(
    mapping: &'a mut ConfigMapping,
    prefix: &str,
    convert: F,
) -> Result<&'a mut ConfigMapping>
where
    F: Fn(&ConfigValue) -> std::result::Result<ConfigValue, ConversionError>,
{
    convert_in(mapping, prefix, &convert)?;
    Ok(mapping)
}

/// Returns the number of converted values
pub(crate) fn convert_in<F>(
    mapping: &mut ConfigMapping,
    prefix: &str,
    convert: &F,
) -> Result<usize>
where
    F: Fn(&ConfigValue) -> std::result::Result<ConfigValue, ConversionError>,
{
    let mut converted = 0;
    for (key, value) in mapping.iter_mut() {
        if key == CONTROL_SECTION {
            continue;
        }
        if let ConfigValue::Table(nested) = value {
            converted += convert_in(nested, prefix, convert)?;
        } else if key.starts_with(prefix) {
            *value = convert(&*value).map_err(|source| ConfigError::Conversion {
                key: key.clone(),
                source,
            })?;
            trace!(key = %key, value = %value, "converted");
            converted += 1;
        }
    }
    Ok(converted)
}

/// Path-construction converter.
///
/// Strings become paths; an empty string is the current directory `"."`.
/// Path values are returned unchanged, so converting twice is a no-op.
/// Arrays are converted element-wise. Anything else is a conversion error.
pub fn to_path(value: &ConfigValue) -> std::result::Result<ConfigValue, ConversionError> {
    match value {
        ConfigValue::String(s) if s.contains('\0') => Err(ConversionError::NulByte),
        ConfigValue::String(s) if s.is_empty() => Ok(ConfigValue::Path(PathBuf::from("."))),
        ConfigValue::String(s) => Ok(ConfigValue::Path(PathBuf::from(s))),
        ConfigValue::Path(p) => Ok(ConfigValue::Path(p.clone())),
        ConfigValue::Array(items) => items
            .iter()
            .map(to_path)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(ConfigValue::Array),
        other => Err(ConversionError::UnexpectedType(other.type_name())),
    }
}
