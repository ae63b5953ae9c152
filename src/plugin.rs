//! Host lifecycle integration.
//!
//! [`MultiLanguage`] is built once when the configuration is loaded and is
//! shared read-only by every request. Each request gets its own [`Request`]
//! holding the mutable state (current language, page indexes), so concurrent
//! requests never see each other.
//!
//! The host calls the request hooks in this order:
//!
//! | Hook                        | Effect                                         |
//! |-----------------------------|------------------------------------------------|
//! | `on_request_url`            | empty URL → localized index, if one exists      |
//! | `on_404_content_loaded`     | localized 404 content, if one exists            |
//! | `on_meta_parsed`            | fixes the current language                      |
//! | `on_content_prepared`       | substitutes `%language_base_url%`               |
//! | `on_single_page_loaded`     | enriches and indexes each page                  |
//! | `on_pages_loaded`           | keeps current-language pages only               |
//! | `on_page_rendering`         | injects the template variables                  |
//! | `on_template_engine_ready`  | registers the `translate` filter                |

use crate::{
    config::{ConfigError, SiteConfig},
    i18n::{
        DateLocalizer, LangCode, LanguageRegistry, LanguageResolver, META_LANGUAGE, META_PID,
        Meta, Page, PageData, PageIndex, RenderContext, RequestError, TranslateError, Translator,
        filter_current, language_base_url, localize::substitute_placeholders, meta_pid, meta_str,
    },
    log,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

/// Name of the translation filter in templates.
pub const TRANSLATE_FILTER: &str = "translate";

/// A template filter: input value and extra arguments to output string.
pub type Filter = Box<dyn Fn(&str, &[Value]) -> Result<String, TranslateError> + Send + Sync>;

/// Filter registration seam of a template engine.
pub trait FilterRegistry {
    fn add_filter(&mut self, name: &str, filter: Filter);
}

// ============================================================================
// Site Settings
// ============================================================================

/// Host settings the hooks read.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub title: String,
    /// Base URL with a trailing slash.
    pub base_url: String,
    pub rewrite_url: bool,
    pub content_dir: PathBuf,
    pub content_ext: String,
    pub date_format: String,
}

impl SiteSettings {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.site.title.clone(),
            base_url: config.base_url(),
            rewrite_url: config.site.rewrite_url,
            content_dir: config.site.content.clone(),
            content_ext: config.site.content_ext.clone(),
            date_format: config.site.date_format.clone(),
        }
    }

    /// `<content>/<dir>/<name><ext>`, `dir` may be empty.
    fn content_file(&self, dir: &str, name: &str) -> PathBuf {
        self.content_dir
            .join(dir)
            .join(format!("{name}{}", self.content_ext))
    }
}

// ============================================================================
// Plugin
// ============================================================================

/// Configuration-time half of the language engine.
#[derive(Debug, Clone)]
pub struct MultiLanguage {
    registry: Arc<LanguageRegistry>,
    site: Arc<SiteSettings>,
}

impl MultiLanguage {
    /// Build the language registry from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Fails fast on an invalid `[i18n]` section.
    pub fn on_config_loaded(config: &SiteConfig) -> Result<Self, ConfigError> {
        let registry = LanguageRegistry::from_config(&config.i18n, &config.root)?;
        log!(
            "i18n";
            "{} languages, default `{}`",
            registry.languages().len(),
            registry.default_language()
        );
        Ok(Self {
            registry: Arc::new(registry),
            site: Arc::new(SiteSettings::from_config(config)),
        })
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn site(&self) -> &SiteSettings {
        &self.site
    }

    /// Register the `language` and `pid` front-matter fields.
    ///
    /// Keys are the meta names, values the front-matter keys (matched
    /// case-insensitively).
    pub fn on_meta_headers(&self, headers: &mut IndexMap<String, String>) {
        headers.insert(META_LANGUAGE.into(), "Language".into());
        headers.insert(META_PID.into(), "pid".into());
    }

    /// Start a request. `accept_language` is the raw `Accept-Language` header.
    pub fn begin_request(&self, accept_language: Option<&str>) -> Request {
        Request {
            registry: Arc::clone(&self.registry),
            site: Arc::clone(&self.site),
            accept_language: accept_language.map(str::to_owned),
            current_language: None,
            index: PageIndex::new(),
            translator: Arc::new(Translator::new(Arc::clone(&self.registry))),
        }
    }
}

// ============================================================================
// Request
// ============================================================================

/// Language state of one request.
#[derive(Debug)]
pub struct Request {
    registry: Arc<LanguageRegistry>,
    site: Arc<SiteSettings>,
    accept_language: Option<String>,
    current_language: Option<LangCode>,
    index: PageIndex,
    translator: Arc<Translator>,
}

impl Request {
    fn resolver(&self) -> LanguageResolver<'_> {
        LanguageResolver::new(&self.registry)
    }

    fn browser_language(&self) -> &LangCode {
        self.resolver().from_browser(self.accept_language.as_deref())
    }

    /// Rewrite an empty URL to the visitor's localized index.
    ///
    /// Only when the content root has no index of its own and the localized
    /// index exists.
    pub fn on_request_url(&self, url: &mut String) {
        if !url.is_empty() || self.site.content_file("", "index").is_file() {
            return;
        }
        let language = self.browser_language();
        if self.site.content_file(language, "index").is_file() {
            log!("request"; "root index not found, using `{language}/index`");
            *url = language.to_string();
        }
    }

    /// Replace not-found content with the visitor's localized 404 page.
    ///
    /// Only when the requested path is not under a language directory, the
    /// content root has no 404 page, and the localized one exists.
    pub fn on_404_content_loaded(&self, request_file: &Path, raw_content: &mut String) {
        let first_segment = request_file
            .strip_prefix(&self.site.content_dir)
            .ok()
            .and_then(|rel| rel.components().next())
            .and_then(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            });
        if first_segment.is_some_and(|s| self.registry.is_available(s))
            || self.site.content_file("", "404").is_file()
        {
            return;
        }

        let language = self.browser_language();
        let localized = self.site.content_file(language, "404");
        if !localized.is_file() {
            return;
        }
        match fs::read_to_string(&localized) {
            Ok(content) => {
                log!("request"; "using localized not-found page `{language}/404`");
                *raw_content = content;
            }
            Err(err) => log!("error"; "cannot read `{}`: {err}", localized.display()),
        }
    }

    /// Resolve and fix the current language from the requested page's meta.
    ///
    /// The resolved code is written back to `meta.language`. Only the first
    /// call has an effect.
    pub fn on_meta_parsed(&mut self, meta: &mut Meta) -> &LangCode {
        if self.current_language.is_none() {
            let resolved = self
                .resolver()
                .from_meta(meta_str(meta, META_LANGUAGE))
                .clone();
            self.current_language = Some(resolved);
        } else {
            log!("i18n"; "current language already resolved, ignoring page metadata");
        }

        let current = self.current_language.get_or_insert_with(|| {
            self.registry.default_language().clone()
        });
        meta.insert(META_LANGUAGE.into(), Value::String(current.to_string()));
        current
    }

    /// Substitute `%language_base_url%` in raw page content.
    pub fn on_content_prepared(&self, raw_content: &mut String) -> Result<(), RequestError> {
        let url = self.language_base_url()?;
        *raw_content = substitute_placeholders(raw_content, &url);
        Ok(())
    }

    /// Enrich a discovered page and add it to both indexes.
    pub fn on_single_page_loaded(&mut self, data: PageData) -> Result<Arc<Page>, RequestError> {
        let current = self.current_language()?.clone();
        let language = self.resolver().from_meta(data.declared_language()).clone();

        let localizer = DateLocalizer::new(&self.registry, &self.site.date_format);
        let date_formatted = match data.date.as_deref() {
            Some(raw) if !raw.is_empty() => localizer.format(raw, &current).unwrap_or_else(|| {
                log!("i18n"; "cannot decode date `{raw}` of `{}`", data.id);
                String::new()
            }),
            _ => String::new(),
        };

        let page = Arc::new(Page {
            pid: meta_pid(&data.meta),
            is_current_language: language == current,
            language,
            date_formatted,
            data,
        });
        self.index.insert(Arc::clone(&page));
        Ok(page)
    }

    /// Keep only the pages of the current language.
    pub fn on_pages_loaded(&self, pages: &mut Vec<Arc<Page>>) {
        filter_current(pages);
    }

    /// Inject the language variables. `variables.meta.pid` selects the
    /// translations listed in `page_languages`.
    pub fn on_page_rendering(
        &self,
        _template_name: &mut String,
        variables: &mut Map<String, Value>,
    ) -> Result<(), RequestError> {
        let pid = variables
            .get("meta")
            .and_then(Value::as_object)
            .and_then(meta_pid);
        self.render_context(pid.as_deref())?.inject(variables)?;
        Ok(())
    }

    /// Register the `translate` filter for the current language.
    pub fn on_template_engine_ready(
        &self,
        filters: &mut dyn FilterRegistry,
    ) -> Result<(), RequestError> {
        let language = self.current_language()?.clone();
        let translator = Arc::clone(&self.translator);
        filters.add_filter(
            TRANSLATE_FILTER,
            Box::new(move |key: &str, args: &[Value]| {
                translator.translate(&language, key, args)
            }),
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The request language, once page metadata has been parsed.
    pub fn current_language(&self) -> Result<&LangCode, RequestError> {
        self.current_language
            .as_ref()
            .ok_or(RequestError::LanguageUnresolved)
    }

    /// Base URL qualified by the current language.
    pub fn language_base_url(&self) -> Result<String, RequestError> {
        Ok(language_base_url(
            &self.site.base_url,
            self.site.rewrite_url,
            self.current_language()?,
        ))
    }

    /// Translate `key` in the current language.
    pub fn translate(&self, key: &str, args: &[Value]) -> Result<String, TranslateError> {
        let language = self.current_language()?;
        self.translator.translate(language, key, args)
    }

    /// Template variables for the page identified by `pid`.
    pub fn render_context(&self, pid: Option<&str>) -> Result<RenderContext, RequestError> {
        let current = self.current_language()?;
        Ok(RenderContext {
            languages: self.registry.languages().clone(),
            page_languages: pid
                .and_then(|pid| self.index.translations(pid))
                .cloned()
                .unwrap_or_default(),
            site_title: self.registry.site_title(current).map(str::to_owned),
            current_language: current.clone(),
            language_base_url: self.language_base_url()?,
        })
    }

    pub fn index(&self) -> &PageIndex {
        &self.index
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;
    use serde_json::json;

    struct Site {
        _dir: tempfile::TempDir,
        plugin: MultiLanguage,
    }

    impl Site {
        fn content(&self) -> PathBuf {
            self.plugin.site().content_dir.clone()
        }
    }

    fn site(i18n: &str, files: &[(&str, &str)]) -> Site {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("content")).unwrap();
        fs::create_dir_all(root.join("language")).unwrap();
        for (path, content) in files {
            let path = root.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        let source = format!(
            "[site]\ntitle = \"My Site\"\nbase_url = \"https://x/\"\n\n[i18n]\n{i18n}"
        );
        let mut config = SiteConfig::from_str(&source).unwrap();
        config.update_path_with_root(root);
        let plugin = MultiLanguage::on_config_loaded(&config).unwrap();
        Site { _dir: dir, plugin }
    }

    const EN_FR: &str = r#"
default_language = "en"
languages = { en = "English", fr = "Français" }
"#;

    fn meta(value: Value) -> Meta {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn page(id: &str, meta_value: Value) -> PageData {
        PageData {
            id: id.into(),
            url: format!("https://x/{id}"),
            title: id.into(),
            date: None,
            meta: meta(meta_value),
        }
    }

    #[derive(Default)]
    struct Filters(FxHashMap<String, Filter>);

    impl FilterRegistry for Filters {
        fn add_filter(&mut self, name: &str, filter: Filter) {
            self.0.insert(name.to_owned(), filter);
        }
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    #[test]
    fn test_on_config_loaded_invalid_languages() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("language")).unwrap();
        let mut config = SiteConfig::from_str("[i18n]\nlanguages = \"en\"").unwrap();
        config.update_path_with_root(dir.path());

        let err = MultiLanguage::on_config_loaded(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Shape { .. }));
    }

    #[test]
    fn test_on_meta_headers() {
        let site = site(EN_FR, &[]);
        let mut headers = IndexMap::new();
        headers.insert("title".to_owned(), "Title".to_owned());
        site.plugin.on_meta_headers(&mut headers);

        assert_eq!(headers["language"], "Language");
        assert_eq!(headers["pid"], "pid");
        assert_eq!(headers.len(), 3);
    }

    // ------------------------------------------------------------------------
    // Request URL and 404
    // ------------------------------------------------------------------------

    #[test]
    fn test_request_url_redirects_to_browser_language() {
        let site = site(EN_FR, &[("content/fr/index.md", "")]);
        let request = site.plugin.begin_request(Some("fr-CA,fr;q=0.9"));

        let mut url = String::new();
        request.on_request_url(&mut url);
        assert_eq!(url, "fr");
    }

    #[test]
    fn test_request_url_keeps_root_index() {
        let site = site(
            EN_FR,
            &[("content/index.md", ""), ("content/fr/index.md", "")],
        );
        let request = site.plugin.begin_request(Some("fr"));

        let mut url = String::new();
        request.on_request_url(&mut url);
        assert_eq!(url, "");
    }

    #[test]
    fn test_request_url_without_localized_index() {
        let site = site(EN_FR, &[("content/fr/index.md", "")]);
        let request = site.plugin.begin_request(Some("de-DE"));

        let mut url = String::new();
        request.on_request_url(&mut url);
        assert_eq!(url, "", "en/index.md does not exist");
    }

    #[test]
    fn test_request_url_non_empty_untouched() {
        let site = site(EN_FR, &[("content/fr/index.md", "")]);
        let request = site.plugin.begin_request(Some("fr"));

        let mut url = "about".to_owned();
        request.on_request_url(&mut url);
        assert_eq!(url, "about");
    }

    #[test]
    fn test_404_uses_localized_page() {
        let site = site(EN_FR, &[("content/fr/404.md", "Page introuvable")]);
        let request = site.plugin.begin_request(Some("fr"));

        let mut raw = "default".to_owned();
        request.on_404_content_loaded(&site.content().join("missing.md"), &mut raw);
        assert_eq!(raw, "Page introuvable");
    }

    #[test]
    fn test_404_under_language_dir_untouched() {
        let site = site(EN_FR, &[("content/fr/404.md", "Page introuvable")]);
        let request = site.plugin.begin_request(Some("fr"));

        let mut raw = "default".to_owned();
        request.on_404_content_loaded(&site.content().join("en/missing.md"), &mut raw);
        assert_eq!(raw, "default");
    }

    #[test]
    fn test_404_root_page_wins() {
        let site = site(
            EN_FR,
            &[("content/404.md", "Not found"), ("content/fr/404.md", "Page introuvable")],
        );
        let request = site.plugin.begin_request(Some("fr"));

        let mut raw = "default".to_owned();
        request.on_404_content_loaded(&site.content().join("missing.md"), &mut raw);
        assert_eq!(raw, "default");
    }

    #[test]
    fn test_404_missing_localized_page() {
        let site = site(EN_FR, &[]);
        let request = site.plugin.begin_request(Some("fr"));

        let mut raw = "default".to_owned();
        request.on_404_content_loaded(&site.content().join("missing.md"), &mut raw);
        assert_eq!(raw, "default");
    }

    // ------------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------------

    #[test]
    fn test_meta_parsed_sets_current_language() {
        let site = site(EN_FR, &[]);
        let mut request = site.plugin.begin_request(None);
        assert!(matches!(
            request.current_language(),
            Err(RequestError::LanguageUnresolved)
        ));

        let mut meta = meta(json!({"language": "fr"}));
        assert_eq!(request.on_meta_parsed(&mut meta), "fr");
        assert_eq!(request.current_language().unwrap(), "fr");
    }

    #[test]
    fn test_meta_parsed_defaults_invalid_language() {
        let site = site(EN_FR, &[]);
        for declared in [json!({}), json!({"language": ""}), json!({"language": "de"})] {
            let mut request = site.plugin.begin_request(Some("fr"));
            let mut meta = meta(declared);
            request.on_meta_parsed(&mut meta);

            assert_eq!(request.current_language().unwrap(), "en");
            assert_eq!(meta["language"], "en");
        }
    }

    #[test]
    fn test_meta_parsed_only_once() {
        let site = site(EN_FR, &[]);
        let mut request = site.plugin.begin_request(None);

        request.on_meta_parsed(&mut meta(json!({"language": "fr"})));
        let mut second = meta(json!({"language": "en"}));
        request.on_meta_parsed(&mut second);

        assert_eq!(request.current_language().unwrap(), "fr");
        assert_eq!(second["language"], "fr");
    }

    #[test]
    fn test_requests_are_isolated() {
        let site = site(EN_FR, &[]);
        let mut first = site.plugin.begin_request(None);
        let mut second = site.plugin.begin_request(None);

        first.on_meta_parsed(&mut meta(json!({"language": "fr"})));
        second.on_meta_parsed(&mut meta(json!({"language": "en"})));
        first
            .on_single_page_loaded(page("fr/index", json!({"language": "fr"})))
            .unwrap();

        assert_eq!(first.current_language().unwrap(), "fr");
        assert_eq!(second.current_language().unwrap(), "en");
        assert!(second.index().is_empty());
    }

    // ------------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------------

    #[test]
    fn test_content_prepared_substitutes_placeholder() {
        let site = site(EN_FR, &[]);
        let mut request = site.plugin.begin_request(None);
        request.on_meta_parsed(&mut meta(json!({"language": "fr"})));

        let mut raw = "[Accueil](%language_base_url%/)".to_owned();
        request.on_content_prepared(&mut raw).unwrap();
        assert_eq!(raw, "[Accueil](https://x/fr/)");
    }

    #[test]
    fn test_content_prepared_before_meta() {
        let site = site(EN_FR, &[]);
        let request = site.plugin.begin_request(None);

        let mut raw = "%language_base_url%".to_owned();
        assert!(request.on_content_prepared(&mut raw).is_err());
        assert_eq!(raw, "%language_base_url%");
    }

    #[test]
    fn test_language_base_url_without_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("language")).unwrap();
        let mut config = SiteConfig::from_str(&format!(
            "[site]\nbase_url = \"https://x/\"\nrewrite_url = false\n\n[i18n]\n{EN_FR}"
        ))
        .unwrap();
        config.update_path_with_root(dir.path());
        let plugin = MultiLanguage::on_config_loaded(&config).unwrap();

        let mut request = plugin.begin_request(None);
        request.on_meta_parsed(&mut meta(json!({"language": "fr"})));
        assert_eq!(request.language_base_url().unwrap(), "https://x?fr");
    }

    // ------------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------------

    #[test]
    fn test_single_page_enrichment() {
        let site = site(EN_FR, &[]);
        let mut request = site.plugin.begin_request(None);
        request.on_meta_parsed(&mut meta(json!({"language": "fr"})));

        let fr = request
            .on_single_page_loaded(page("fr/a", json!({"language": "fr", "pid": "a"})))
            .unwrap();
        let en = request
            .on_single_page_loaded(page("a", json!({"language": "en", "pid": "a"})))
            .unwrap();
        let unknown = request
            .on_single_page_loaded(page("b", json!({"language": "de"})))
            .unwrap();

        assert_eq!(fr.language, "fr");
        assert!(fr.is_current_language);
        assert_eq!(fr.pid.as_deref(), Some("a"));
        assert_eq!(en.language, "en");
        assert!(!en.is_current_language);
        assert_eq!(unknown.language, "en", "unavailable language falls back to default");
        assert_eq!(unknown.pid, None);
    }

    #[test]
    fn test_single_page_before_meta() {
        let site = site(EN_FR, &[]);
        let mut request = site.plugin.begin_request(None);
        let result = request.on_single_page_loaded(page("a", json!({})));
        assert!(matches!(result, Err(RequestError::LanguageUnresolved)));
    }

    #[test]
    fn test_date_formatted_in_current_language() {
        let site = site(
            r#"
default_language = "en"
languages = { en = "English", fr = "Français" }
date_formats = { fr = "%d %B %Y" }
date_locales = { fr = "fr_FR" }
"#,
            &[],
        );
        let mut request = site.plugin.begin_request(None);
        request.on_meta_parsed(&mut meta(json!({"language": "fr"})));

        let mut data = page("a", json!({"language": "en"}));
        data.date = Some("2024-01-15".into());
        let dated = request.on_single_page_loaded(data).unwrap();

        let mut data = page("b", json!({}));
        data.date = Some("not a date".into());
        let undated = request.on_single_page_loaded(data).unwrap();

        assert_eq!(dated.date_formatted, "15 janvier 2024");
        assert_eq!(undated.date_formatted, "");
    }

    #[test]
    fn test_pages_loaded_filters_current_language() {
        let site = site(EN_FR, &[]);
        let mut request = site.plugin.begin_request(None);
        request.on_meta_parsed(&mut meta(json!({"language": "en"})));

        let mut pages = vec![
            request
                .on_single_page_loaded(page("a", json!({"language": "en"})))
                .unwrap(),
            request
                .on_single_page_loaded(page("fr/a", json!({"language": "fr"})))
                .unwrap(),
            request
                .on_single_page_loaded(page("b", json!({})))
                .unwrap(),
        ];
        request.on_pages_loaded(&mut pages);

        let ids: Vec<_> = pages.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(pages.iter().all(|p| p.language == "en"));
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    #[test]
    fn test_page_rendering_injects_context() {
        let site = site(
            r#"
default_language = "en"
languages = { en = "English", fr = "Français" }
site_titles = { fr = "Mon Site" }
"#,
            &[],
        );
        let mut request = site.plugin.begin_request(None);
        let mut page_meta = meta(json!({"language": "fr", "pid": "p1"}));
        request.on_meta_parsed(&mut page_meta);
        request
            .on_single_page_loaded(page("about", json!({"language": "en", "pid": "p1"})))
            .unwrap();
        request
            .on_single_page_loaded(page("fr/about", json!({"language": "fr", "pid": "p1"})))
            .unwrap();

        let mut variables = Map::new();
        variables.insert("site_title".into(), json!("My Site"));
        variables.insert("meta".into(), Value::Object(page_meta));
        let mut template = "index".to_owned();
        request
            .on_page_rendering(&mut template, &mut variables)
            .unwrap();

        assert_eq!(variables["site_title"], "Mon Site");
        assert_eq!(variables["current_language"], "fr");
        assert_eq!(variables["language_base_url"], "https://x/fr");
        assert_eq!(variables["languages"]["fr"], "Français");
        assert_eq!(variables["page_languages"]["en"]["id"], "about");
        assert_eq!(variables["page_languages"]["fr"]["id"], "fr/about");
    }

    #[test]
    fn test_page_rendering_without_pid() {
        let site = site(EN_FR, &[]);
        let mut request = site.plugin.begin_request(None);
        request.on_meta_parsed(&mut meta(json!({})));

        let mut variables = Map::new();
        variables.insert("site_title".into(), json!("My Site"));
        request
            .on_page_rendering(&mut String::new(), &mut variables)
            .unwrap();

        assert_eq!(variables["page_languages"], json!({}));
        assert_eq!(variables["site_title"], "My Site");
    }

    // ------------------------------------------------------------------------
    // Translation
    // ------------------------------------------------------------------------

    #[test]
    fn test_translate_filter() {
        let site = site(
            EN_FR,
            &[
                ("language/en.toml", r#"greeting = "Hello, %s!""#),
                ("language/fr.toml", r#"greeting = "Bonjour, %s !""#),
            ],
        );
        let mut request = site.plugin.begin_request(None);
        request.on_meta_parsed(&mut meta(json!({"language": "fr"})));

        let mut filters = Filters::default();
        request.on_template_engine_ready(&mut filters).unwrap();
        let translate = &filters.0[TRANSLATE_FILTER];

        assert_eq!(translate("greeting", &[json!("Ada")]).unwrap(), "Bonjour, Ada !");
        assert_eq!(translate("missing.key", &[]).unwrap(), "missing.key");
    }

    #[test]
    fn test_translate_current_language() {
        let site = site(EN_FR, &[("language/en.toml", r#"greeting = "Hello, %s!""#)]);
        let mut request = site.plugin.begin_request(None);
        request.on_meta_parsed(&mut meta(json!({"language": "en"})));

        assert_eq!(
            request.translate("greeting", &[json!("Ada")]).unwrap(),
            "Hello, Ada!"
        );
        assert_eq!(request.translate("missing.key", &[]).unwrap(), "missing.key");
    }

    #[test]
    fn test_translate_missing_catalog_is_fatal() {
        let site = site(EN_FR, &[("language/en.toml", "")]);
        let mut request = site.plugin.begin_request(None);
        request.on_meta_parsed(&mut meta(json!({"language": "fr"})));

        assert!(matches!(
            request.translate("greeting", &[]),
            Err(TranslateError::MissingCatalog { .. })
        ));
    }

    // ------------------------------------------------------------------------
    // Scenario
    // ------------------------------------------------------------------------

    #[test]
    fn test_two_language_scenario() {
        let site = site(EN_FR, &[]);
        let mut request = site.plugin.begin_request(None);
        let mut current_meta = meta(json!({"language": "fr", "pid": "p1"}));
        request.on_meta_parsed(&mut current_meta);

        let mut pages = vec![
            request
                .on_single_page_loaded(page("p1", json!({"pid": "p1", "language": "en"})))
                .unwrap(),
            request
                .on_single_page_loaded(page("fr/p1", json!({"pid": "p1", "language": "fr"})))
                .unwrap(),
        ];
        request.on_pages_loaded(&mut pages);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].language, "fr");

        let context = request.render_context(Some("p1")).unwrap();
        let languages: Vec<_> = context.page_languages.keys().map(LangCode::as_str).collect();
        assert_eq!(languages, vec!["en", "fr"]);
    }
}
