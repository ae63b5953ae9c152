//! Language registry: the validated language settings of a site.
//!
//! Built once from the raw `[i18n]` table when the configuration is loaded and
//! immutable afterwards. Requests share it behind an `Arc`.

use crate::config::{ConfigError, defaults};
use crate::i18n::localize::is_valid_format;
use compact_str::CompactString;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// ISO 639-1 style language code as written in the configuration (`"en"`, `"fr"`).
pub type LangCode = CompactString;

/// Keys accepted in the `[i18n]` section.
const KNOWN_FIELDS: &[&str] = &[
    "default_language",
    "language_dir",
    "languages",
    "site_titles",
    "date_formats",
    "date_locales",
];

/// Validated language settings.
///
/// # Example
/// ```toml
/// [i18n]
/// default_language = "en"
/// language_dir = "language"
/// languages = { en = "English", fr = "Français" }
/// site_titles = { fr = "Mon Site" }
/// date_formats = { fr = "%d %B %Y" }
/// date_locales = { fr = "fr_FR" }
/// ```
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    default_language: LangCode,
    /// Code → display name, in configuration order.
    languages: IndexMap<LangCode, String>,
    /// Absolute directory holding one translation catalog per language.
    language_dir: PathBuf,
    site_titles: FxHashMap<LangCode, String>,
    date_formats: FxHashMap<LangCode, String>,
    date_locales: FxHashMap<LangCode, String>,
}

impl LanguageRegistry {
    /// Build the registry from the raw `[i18n]` table.
    ///
    /// `root` is the project root `language_dir` is resolved against.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Shape`] if one of the map fields is not a table
    /// - [`ConfigError::LanguageDir`] if the language directory does not exist
    /// - [`ConfigError::Validation`] for unknown fields, non-string values,
    ///   an empty language list, a default language that is not listed, or an
    ///   invalid date format
    pub fn from_config(raw: &toml::Table, root: &Path) -> Result<Self, ConfigError> {
        if let Some(unknown) = raw.keys().find(|k| !KNOWN_FIELDS.contains(&k.as_str())) {
            return Err(ConfigError::Validation(format!(
                "unknown field `[i18n.{unknown}]`"
            )));
        }

        let default_language = string_field(raw, "default_language", "[i18n.default_language]")?
            .unwrap_or(defaults::i18n::DEFAULT_LANGUAGE);

        let languages: IndexMap<LangCode, String> =
            match string_map(raw, "languages", "[i18n.languages]")? {
                Some(languages) => languages,
                None => defaults::i18n::LANGUAGES
                    .iter()
                    .map(|(code, name)| (LangCode::new(code), (*name).to_owned()))
                    .collect(),
            };
        if languages.is_empty() {
            return Err(ConfigError::Validation(
                "[i18n.languages] must declare at least one language".into(),
            ));
        }
        if default_language.is_empty() || !languages.contains_key(default_language) {
            return Err(ConfigError::Validation(format!(
                "[i18n.default_language] `{default_language}` is not one of [i18n.languages]"
            )));
        }

        let language_dir = string_field(raw, "language_dir", "[i18n.language_dir]")?
            .unwrap_or(defaults::i18n::LANGUAGE_DIR);
        let language_dir = resolve_language_dir(root, language_dir)?;

        let site_titles = string_map(raw, "site_titles", "[i18n.site_titles]")?
            .unwrap_or_default()
            .into_iter()
            .collect();

        let date_formats: FxHashMap<LangCode, String> =
            string_map(raw, "date_formats", "[i18n.date_formats]")?
                .unwrap_or_default()
                .into_iter()
                .collect();
        if let Some((code, format)) = date_formats.iter().find(|(_, f)| !is_valid_format(f)) {
            return Err(ConfigError::Validation(format!(
                "[i18n.date_formats.{code}] `{format}` is not a valid strftime format"
            )));
        }

        let date_locales = string_map(raw, "date_locales", "[i18n.date_locales]")?
            .unwrap_or_default()
            .into_iter()
            .collect();

        Ok(Self {
            default_language: LangCode::new(default_language),
            languages,
            language_dir,
            site_titles,
            date_formats,
            date_locales,
        })
    }

    /// The fallback language for pages and visitors.
    pub fn default_language(&self) -> &LangCode {
        &self.default_language
    }

    /// All languages with their display names, in configuration order.
    pub fn languages(&self) -> &IndexMap<LangCode, String> {
        &self.languages
    }

    /// Codes of all available languages, in configuration order.
    pub fn available(&self) -> impl Iterator<Item = &LangCode> {
        self.languages.keys()
    }

    /// Returns the registry's own copy of `code` if it is available.
    pub fn get(&self, code: &str) -> Option<&LangCode> {
        self.languages.get_key_value(code).map(|(k, _)| k)
    }

    pub fn is_available(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }

    pub fn display_name(&self, code: &str) -> Option<&str> {
        self.languages.get(code).map(String::as_str)
    }

    /// Site title override for `code`, only if one is configured and non-empty.
    pub fn site_title(&self, code: &str) -> Option<&str> {
        self.site_titles
            .get(code)
            .map(String::as_str)
            .filter(|title| !title.is_empty())
    }

    pub fn date_format(&self, code: &str) -> Option<&str> {
        self.date_formats.get(code).map(String::as_str)
    }

    pub fn date_locale(&self, code: &str) -> Option<&str> {
        self.date_locales.get(code).map(String::as_str)
    }

    pub fn language_dir(&self) -> &Path {
        &self.language_dir
    }

    /// Path of the translation catalog for `code`: `<language_dir>/<code>.toml`.
    pub fn catalog_path(&self, code: &str) -> PathBuf {
        self.language_dir.join(format!("{code}.toml"))
    }
}

// ============================================================================
// Raw Table Helpers
// ============================================================================

/// Read an optional string field.
fn string_field<'a>(
    raw: &'a toml::Table,
    key: &str,
    field: &'static str,
) -> Result<Option<&'a str>, ConfigError> {
    match raw.get(key) {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ConfigError::Validation(format!(
            "{field} must be a string, found `{other}`"
        ))),
    }
}

/// Read an optional `code → string` table, keeping file order.
fn string_map(
    raw: &toml::Table,
    key: &str,
    field: &'static str,
) -> Result<Option<IndexMap<LangCode, String>>, ConfigError> {
    let table = match raw.get(key) {
        None => return Ok(None),
        Some(toml::Value::Table(table)) => table,
        Some(other) => {
            return Err(ConfigError::Shape {
                field,
                found: other.to_string(),
            });
        }
    };

    table
        .iter()
        .map(|(code, value)| match value {
            toml::Value::String(s) => Ok((LangCode::new(code), s.clone())),
            other => Err(ConfigError::Validation(format!(
                "{field} entry `{code}` must be a string, found `{other}`"
            ))),
        })
        .collect::<Result<IndexMap<_, _>, _>>()
        .map(Some)
}

/// Resolve the catalog directory against the root; it must exist.
fn resolve_language_dir(root: &Path, dir: &str) -> Result<PathBuf, ConfigError> {
    let path = root.join(dir);
    if !path.is_dir() {
        return Err(ConfigError::LanguageDir(path));
    }
    path.canonicalize()
        .map_err(|_| ConfigError::LanguageDir(path))
}

// ============================================================================
// Tests
// ============================================================================
