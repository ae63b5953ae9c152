//! Site configuration management for `polyglot.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                            |
//! |-------------|----------------------------------------------------|
//! | `[site]`    | Host settings (base url, content dir, date format) |
//! | `[i18n]`    | Languages, titles, date formats/locales, catalogs  |
//! | `[serve]`   | Development server (interface, port)               |
//!
//! `[i18n]` is kept as a raw table here. It is validated field by field when
//! the [`LanguageRegistry`](crate::i18n::LanguageRegistry) is built, so shape
//! errors can name the offending field.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "My Site"
//! base_url = "https://example.com/"
//!
//! [i18n]
//! default_language = "en"
//! languages = { en = "English", fr = "Français" }
//! site_titles = { fr = "Mon Site" }
//! date_formats = { fr = "%d %B %Y" }
//!
//! [serve]
//! port = 5277
//! ```

pub mod defaults;
mod error;
mod serve;
mod site;

pub use error::ConfigError;
pub use serve::ServeConfig;
pub use site::SiteSection;

use crate::{
    cli::{Cli, Commands},
    i18n::localize::is_valid_format,
};
use educe::Educe;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing polyglot.toml
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Absolute project root (set after loading)
    #[serde(skip)]
    #[educe(Default = PathBuf::from("./"))]
    pub root: PathBuf,

    /// Host settings
    #[serde(default)]
    pub site: SiteSection,

    /// Raw language settings, validated into a `LanguageRegistry`
    #[serde(default)]
    pub i18n: toml::Table,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Read `<root>/<config>`, apply CLI overrides and validate.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = Self::from_path(&config_path)?;
        config.config_path = Self::normalize_path(&config_path);
        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.root.clone());
        Self::update_option(&mut self.site.content, cli.content.as_ref());

        if let Commands::Serve { interface, port } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
        if let Some(base_url) = &cli.base_url {
            self.site.base_url = Some(base_url.clone());
        }

        self.update_path_with_root(&root);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize root and content paths to absolute paths.
    ///
    /// `[i18n.language_dir]` is resolved against the same root when the
    /// registry is built.
    pub fn update_path_with_root(&mut self, root: &Path) {
        self.root = Self::normalize_path(root);
        self.site.content = Self::normalize_path(&self.root.join(&self.site.content));
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Site base URL with a trailing slash.
    ///
    /// Falls back to the dev server address when `[site.base_url]` is unset.
    pub fn base_url(&self) -> String {
        let base = match &self.site.base_url {
            Some(url) => url.clone(),
            None => format!("http://{}:{}", self.serve.interface, self.serve.port),
        };
        if base.ends_with('/') {
            base
        } else {
            format!("{base}/")
        }
    }

    /// Validate host settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.site.base_url
            && !base_url.starts_with("http")
        {
            return Err(ConfigError::Validation(
                "[site.base_url] must start with http:// or https://".into(),
            ));
        }

        if !self.site.content_ext.starts_with('.') {
            return Err(ConfigError::Validation(
                "[site.content_ext] must start with a dot, e.g. \".md\"".into(),
            ));
        }

        if !is_valid_format(&self.site.date_format) {
            return Err(ConfigError::Validation(format!(
                "[site.date_format] `{}` is not a valid strftime format",
                self.site.date_format
            )));
        }

        if !self.site.content.is_dir() {
            return Err(ConfigError::Validation(format!(
                "[site.content] `{}` is not a directory",
                self.site.content.display()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
