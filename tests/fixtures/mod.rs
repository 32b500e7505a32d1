//! Test fixtures for layered loading
//!
//! Documents under `tests/fixtures/layered/`:
//! - `defaults.toml`: low-precedence base declaring `path_` prefixes
//! - `service.toml`: primary document overriding parts of the defaults
//! - `plain.toml`: prefixed keys but no control section
//! - `bad_prefix_value.toml`: a prefixed key holding a non-string

use std::path::{Path, PathBuf};

/// Path to a document in the layered fixture directory
pub fn layered(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/layered")
        .join(name)
}

pub fn defaults_path() -> PathBuf {
    layered("defaults.toml")
}

pub fn service_path() -> PathBuf {
    layered("service.toml")
}

pub fn plain_path() -> PathBuf {
    layered("plain.toml")
}

pub fn bad_prefix_value_path() -> PathBuf {
    layered("bad_prefix_value.toml")
}
