//! Translation catalogs.
//!
//! One TOML table per language under the language directory, addressed by
//! language code (`language/fr.toml`). Nested tables flatten to dotted keys:
//!
//! ```toml
//! greeting = "Bonjour, %s !"
//!
//! [nav]
//! home = "Accueil"     # looked up as "nav.home"
//! ```

use super::{LangCode, LanguageRegistry, TranslateError, sprintf::sprintf};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Key → translated string table of one language.
#[derive(Debug, Clone)]
pub struct Catalog {
    language: LangCode,
    path: PathBuf,
    entries: FxHashMap<String, String>,
}

impl Catalog {
    /// Load the catalog of `language` from `path`.
    ///
    /// # Errors
    ///
    /// [`TranslateError::MissingCatalog`] if the file does not exist,
    /// otherwise IO or TOML errors.
    pub fn load(language: &str, path: &Path) -> Result<Self, TranslateError> {
        if !path.is_file() {
            return Err(TranslateError::MissingCatalog {
                language: language.to_owned(),
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|source| TranslateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(language, path, &content)
    }

    /// Parse catalog source. `path` is only used in error messages.
    pub fn parse(language: &str, path: &Path, content: &str) -> Result<Self, TranslateError> {
        let table: toml::Table = toml::from_str(content).map_err(|source| TranslateError::Catalog {
            path: path.to_path_buf(),
            source,
        })?;

        let mut entries = FxHashMap::default();
        flatten_into(&mut entries, "", &table);

        Ok(Self {
            language: LangCode::new(language),
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn language(&self) -> &LangCode {
        &self.language
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Translation of `key`, if present and non-empty.
    ///
    /// Only `""` counts as empty: a translation of `"0"` is returned as is.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Translate `key` and apply printf-style `args`.
    ///
    /// Missing or empty translations return `key` unchanged, without
    /// formatting.
    pub fn translate(&self, key: &str, args: &[Value]) -> Result<String, TranslateError> {
        let Some(template) = self.get(key) else {
            return Ok(key.to_owned());
        };
        if args.is_empty() {
            return Ok(template.to_owned());
        }
        sprintf(template, args).map_err(|source| TranslateError::Format {
            key: key.to_owned(),
            source,
        })
    }
}

/// Flatten nested tables into dotted keys. Arrays have no key form and are skipped.
fn flatten_into(entries: &mut FxHashMap<String, String>, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(nested) => flatten_into(entries, &key, nested),
            toml::Value::Array(_) => {}
            toml::Value::String(s) => {
                entries.insert(key, s.clone());
            }
            other => {
                entries.insert(key, other.to_string());
            }
        }
    }
}

// ============================================================================
// Translator
// ============================================================================

/// Catalog lookups for one request.
///
/// Keeps the last loaded catalog and reloads only when asked for another
/// language, so a request normally reads its catalog once.
#[derive(Debug)]
pub struct Translator {
    registry: Arc<LanguageRegistry>,
    cached: Mutex<Option<Arc<Catalog>>>,
}

impl Translator {
    pub fn new(registry: Arc<LanguageRegistry>) -> Self {
        Self {
            registry,
            cached: Mutex::new(None),
        }
    }

    /// Catalog of `language`, loaded on first use.
    pub fn catalog(&self, language: &str) -> Result<Arc<Catalog>, TranslateError> {
        let mut cached = self.cached.lock();
        if let Some(catalog) = cached.as_ref().filter(|c| c.language() == language) {
            return Ok(Arc::clone(catalog));
        }

        let catalog = Arc::new(Catalog::load(
            language,
            &self.registry.catalog_path(language),
        )?);
        *cached = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Translate `key` in `language`.
    pub fn translate(
        &self,
        language: &str,
        key: &str,
        args: &[Value],
    ) -> Result<String, TranslateError> {
        self.catalog(language)?.translate(key, args)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::sprintf::FormatError;
    use serde_json::json;

    fn parse(content: &str) -> Catalog {
        Catalog::parse("en", Path::new("en.toml"), content).unwrap()
    }

    fn site(catalogs: &[(&str, &str)]) -> (tempfile::TempDir, Arc<LanguageRegistry>) {
        let dir = tempfile::tempdir().unwrap();
        let language_dir = dir.path().join("language");
        fs::create_dir_all(&language_dir).unwrap();
        for (code, content) in catalogs {
            fs::write(language_dir.join(format!("{code}.toml")), content).unwrap();
        }
        let raw: toml::Table = r#"languages = { en = "English", fr = "Français" }"#
            .parse()
            .unwrap();
        let registry = LanguageRegistry::from_config(&raw, dir.path()).unwrap();
        (dir, Arc::new(registry))
    }

    #[test]
    fn test_translate_found() {
        let catalog = parse(r#"greeting = "Hello, %s!""#);
        assert_eq!(
            catalog.translate("greeting", &[json!("Ada")]).unwrap(),
            "Hello, Ada!"
        );
    }

    #[test]
    fn test_translate_without_args_skips_formatting() {
        let catalog = parse(r#"progress = "100%""#);
        assert_eq!(catalog.translate("progress", &[]).unwrap(), "100%");
    }

    #[test]
    fn test_missing_key_returns_key() {
        let catalog = parse(r#"greeting = "Hello""#);
        assert_eq!(catalog.translate("missing.key", &[]).unwrap(), "missing.key");
        assert_eq!(
            catalog.translate("missing.key", &[json!("x")]).unwrap(),
            "missing.key"
        );
    }

    #[test]
    fn test_empty_value_returns_key() {
        let catalog = parse(r#"blank = """#);
        assert_eq!(catalog.get("blank"), None);
        assert_eq!(catalog.translate("blank", &[]).unwrap(), "blank");
    }

    #[test]
    fn test_zero_value_is_a_translation() {
        let catalog = parse(r#"count = "0""#);
        assert_eq!(catalog.get("count"), Some("0"));
        assert_eq!(catalog.translate("count", &[]).unwrap(), "0");
    }

    #[test]
    fn test_oversized_width_is_format_error() {
        let catalog = parse(r#"wide = "%99999999999s""#);
        let err = catalog.translate("wide", &[json!("a")]).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::Format {
                source: FormatError::OutOfRange { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_format_error_propagates() {
        let catalog = parse(r#"pair = "%s and %s""#);
        let err = catalog.translate("pair", &[json!("a")]).unwrap_err();
        assert!(matches!(err, TranslateError::Format { ref key, .. } if key == "pair"));
    }

    #[test]
    fn test_nested_tables_flatten() {
        let catalog = parse(
            r#"
            count = 3
            list = ["a", "b"]

            [nav]
            home = "Home"

            [nav.footer]
            legal = "Legal"
        "#,
        );
        assert_eq!(catalog.get("nav.home"), Some("Home"));
        assert_eq!(catalog.get("nav.footer.legal"), Some("Legal"));
        assert_eq!(catalog.get("count"), Some("3"));
        assert_eq!(catalog.get("list"), None);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_invalid_catalog() {
        let err = Catalog::parse("en", Path::new("en.toml"), "greeting = ").unwrap_err();
        assert!(matches!(err, TranslateError::Catalog { .. }));
    }

    #[test]
    fn test_translator_loads_language_table() {
        let (_dir, registry) = site(&[
            ("en", r#"greeting = "Hello, %s!""#),
            ("fr", r#"greeting = "Bonjour, %s !""#),
        ]);
        let translator = Translator::new(registry);

        assert_eq!(
            translator.translate("fr", "greeting", &[json!("Ada")]).unwrap(),
            "Bonjour, Ada !"
        );
        assert_eq!(
            translator.translate("en", "greeting", &[json!("Ada")]).unwrap(),
            "Hello, Ada!"
        );
    }

    #[test]
    fn test_translator_caches_catalog() {
        let (dir, registry) = site(&[("en", r#"greeting = "Hello""#)]);
        let translator = Translator::new(registry);

        let first = translator.catalog("en").unwrap();
        fs::write(dir.path().join("language/en.toml"), r#"greeting = "Changed""#).unwrap();
        let second = translator.catalog("en").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.get("greeting"), Some("Hello"));
    }

    #[test]
    fn test_translator_missing_catalog() {
        let (_dir, registry) = site(&[("en", "")]);
        let translator = Translator::new(registry);

        let err = translator.translate("fr", "greeting", &[]).unwrap_err();
        assert!(matches!(err, TranslateError::MissingCatalog { ref language, .. } if language == "fr"));
    }
}
