//! Layered configuration
//!
//! Loads a TOML document over a lower-precedence base:
//! 1. Override source (a document or an in-memory mapping)
//! 2. Primary document (wins on conflicting keys)
//!
//! After merging, the control section `[tomlconfig]` may declare key-name
//! prefixes whose values are converted into filesystem paths.

mod convert;
mod loader;
mod lookup;
mod merge;

pub use convert::{prefix_convert, to_path};
pub use loader::{load, load_into, load_layers, load_str, Override};
pub use lookup::{deep_get, deep_get_or, ConfigQuery};
pub use merge::{deep_merge, merge_layers};

/// Reserved top-level key holding loader directives. Never converted.
pub const CONTROL_SECTION: &str = "tomlconfig";

/// Key inside [`CONTROL_SECTION`] listing path prefixes
pub const PATH_PREFIX_KEY: &str = "path_prefix";
