//! Configuration merge logic
//!
//! Merge semantics:
//! - Tables: deep-merge by key, in place
//! - Everything else (scalars, arrays, type mismatches): override wins

use crate::value::{ConfigMapping, ConfigValue};

/// Deep merge `overlay` into `base`, mutating and returning `base`.
///
/// A key present in both as tables is merged recursively without replacing
/// the nested table. Any other value in `overlay` replaces the value in
/// `base` wholesale, whatever its prior type. `overlay` is left untouched.
pub fn deep_merge<'a>(
    base: &'a mut ConfigMapping,
    overlay: &ConfigMapping,
) -> &'a mut ConfigMapping {
    for (key, overlay_value) in overlay {
        if let (Some(ConfigValue::Table(base_table)), ConfigValue::Table(overlay_table)) =
            (base.get_mut(key), overlay_value)
        {
            deep_merge(base_table, overlay_table);
            continue;
        }
        base.insert(key.clone(), overlay_value.clone());
    }
    base
}

/// Merge multiple config layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: impl IntoIterator<Item = ConfigMapping>) -> ConfigMapping {
    layers.into_iter().fold(ConfigMapping::new(), |mut acc, layer| {
        deep_merge(&mut acc, &layer);
        acc
    })
}
