//! tomlconfig - layered TOML configuration
//!
//! Loads a TOML document, merges it over an optional override source, and
//! converts string values into filesystem paths for keys whose names start
//! with the prefixes declared in the document's `[tomlconfig]` section.
//!
//! ```no_run
//! use tomlconfig::{load, ConfigQuery};
//!
//! let config = load("site.toml", "defaults.toml")?;
//! let data_dir = config.get_path("path_data");
//! # Ok::<(), tomlconfig::ConfigError>(())
//! ```

pub mod config;
pub mod error;
pub mod value;

pub use config::{
    deep_get, deep_get_or, deep_merge, load, load_into, load_layers, load_str, merge_layers,
    prefix_convert, to_path, ConfigQuery, Override, CONTROL_SECTION, PATH_PREFIX_KEY,
};
pub use error::{ConfigError, ConversionError, Result};
pub use value::{ConfigMapping, ConfigValue};
