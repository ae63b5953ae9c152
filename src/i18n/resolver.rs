//! Language resolution.
//!
//! Two independent strategies:
//!
//! - [`LanguageResolver::from_meta`]: authoritative, from a page's declared
//!   `language`, used once per request to fix the current language.
//! - [`LanguageResolver::from_browser`]: heuristic, from the first two
//!   characters of the `Accept-Language` header, used only before any page
//!   metadata is known (root index redirect, localized 404).
//!
//! Both fall back to the default language and always return a member of the
//! available languages.

use super::{LangCode, LanguageRegistry};

#[derive(Debug, Clone, Copy)]
pub struct LanguageResolver<'a> {
    registry: &'a LanguageRegistry,
}

impl<'a> LanguageResolver<'a> {
    pub fn new(registry: &'a LanguageRegistry) -> Self {
        Self { registry }
    }

    /// Language of a page from its declared `language`.
    ///
    /// Absent, empty or unavailable values give the default language.
    pub fn from_meta(&self, declared: Option<&str>) -> &'a LangCode {
        declared
            .filter(|code| !code.is_empty())
            .and_then(|code| self.registry.get(code))
            .unwrap_or_else(|| self.registry.default_language())
    }

    /// Language from the visitor's preference header.
    ///
    /// Only the first two characters are inspected: `fr-CA,en;q=0.8` gives
    /// `fr` if available. Quality values are not considered.
    pub fn from_browser(&self, header: Option<&str>) -> &'a LangCode {
        header
            .map(browser_prefix)
            .and_then(|prefix| self.registry.get(prefix))
            .unwrap_or_else(|| self.registry.default_language())
    }
}

/// First two characters of the header.
fn browser_prefix(header: &str) -> &str {
    match header.char_indices().nth(2) {
        Some((end, _)) => &header[..end],
        None => header,
    }
}
