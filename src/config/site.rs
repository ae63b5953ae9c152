//! `[site]` section configuration.
//!
//! Host-level settings the language engine reads but does not own: base URL,
//! URL rewriting, content location and the global date format.

use super::defaults;
use educe::Educe;
use serde::Deserialize;
use std::path::PathBuf;

/// `[site]` section in polyglot.toml.
///
/// # Example
/// ```toml
/// [site]
/// title = "My Site"
/// base_url = "https://example.com/"
/// rewrite_url = true
/// content = "content"
/// content_ext = ".md"
/// date_format = "%D %T"
/// ```
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Site title, overridable per language via `[i18n.site_titles]`.
    #[serde(default)]
    pub title: String,

    /// Base URL of the site. Falls back to the dev server address.
    #[serde(default = "defaults::site::base_url")]
    #[educe(Default = defaults::site::base_url())]
    pub base_url: Option<String>,

    /// Whether pretty URLs are enabled (`/fr/about` instead of `?fr/about`).
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub rewrite_url: bool,

    /// Content directory, relative to the project root.
    #[serde(default = "defaults::site::content")]
    #[educe(Default = defaults::site::content())]
    pub content: PathBuf,

    /// Extension of content files, including the leading dot.
    #[serde(default = "defaults::site::content_ext")]
    #[educe(Default = defaults::site::content_ext())]
    pub content_ext: String,

    /// Global strftime format used when a language has no override.
    #[serde(default = "defaults::site::date_format")]
    #[educe(Default = defaults::site::date_format())]
    pub date_format: String,
}
