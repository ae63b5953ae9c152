//! Template variables contributed by the language engine.

use super::{LangCode, index::Translations};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// Variables injected before a page is rendered.
///
/// | Variable            | Content                                          |
/// |---------------------|--------------------------------------------------|
/// | `languages`         | code → display name of every language            |
/// | `page_languages`    | language → page, translations of the current page |
/// | `site_title`        | per-language title, only when overridden          |
/// | `current_language`  | code of the request language                     |
/// | `language_base_url` | base URL qualified by the current language       |
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub languages: IndexMap<LangCode, String>,
    pub page_languages: Translations,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_title: Option<String>,
    pub current_language: LangCode,
    pub language_base_url: String,
}

impl RenderContext {
    /// Merge into template variables, overwriting existing entries.
    pub fn inject(&self, variables: &mut Map<String, Value>) -> Result<(), serde_json::Error> {
        if let Value::Object(map) = serde_json::to_value(self)? {
            variables.extend(map);
        }
        Ok(())
    }
}
