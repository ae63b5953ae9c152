//! Errors raised while serving a request.

use super::sprintf::FormatError;
use std::path::PathBuf;
use thiserror::Error;

/// Translation lookup errors.
///
/// A missing key is not an error: the key itself is returned.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Translated template and arguments are incompatible.
    #[error("cannot format translation `{key}`: {source}")]
    Format {
        key: String,
        #[source]
        source: FormatError,
    },

    #[error("no translation catalog for language `{language}` at `{}`", path.display())]
    MissingCatalog { language: String, path: PathBuf },

    #[error("invalid translation catalog `{}`", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error when reading translation catalog `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Errors of the per-request stages.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A stage needing the current language ran before page metadata was parsed.
    #[error("current language is not resolved yet: page metadata has not been parsed")]
    LanguageUnresolved,

    #[error("cannot build template variables")]
    Variables(#[from] serde_json::Error),
}
