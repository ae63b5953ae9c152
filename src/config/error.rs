//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
///
/// All of them are fatal: they abort startup before any request is served.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid {field}, `{found}` must be a table")]
    Shape { field: &'static str, found: String },

    #[error("Invalid language directory `{0}`")]
    LanguageDir(PathBuf),

    #[error("Config validation error: {0}")]
    Validation(String),
}
