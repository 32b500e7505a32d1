//! Error types for configuration loading

use std::io;
use std::path::PathBuf;

/// Errors that can occur while loading, merging or converting configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An argument is not one of the accepted shapes. Raised before any I/O.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse TOML{}: {source}", display_path(path))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot convert '{key}': {source}")]
    Conversion {
        key: String,
        #[source]
        source: ConversionError,
    },

    /// The control section is present but malformed
    #[error("Invalid control section: {0}")]
    InvalidControl(String),
}

/// Reasons a converter rejects a value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("path contains a NUL byte")]
    NulByte,

    #[error("expected string, found {0}")]
    UnexpectedType(&'static str),
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" in {}", p.display()),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
