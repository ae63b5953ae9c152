//! Page records handed over by the host and their enriched form.

use super::LangCode;
use serde::Serialize;
use serde_json::Value;

/// Parsed front-matter, keyed by the registered meta header names.
pub type Meta = serde_json::Map<String, Value>;

/// Meta key of the declared page language.
pub const META_LANGUAGE: &str = "language";
/// Meta key of the cross-language page id.
pub const META_PID: &str = "pid";

/// A discovered page as the host produces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageData {
    /// Path relative to the content directory, without extension.
    pub id: String,
    pub url: String,
    pub title: String,
    /// Raw `date` header, undecoded.
    pub date: Option<String>,
    pub meta: Meta,
}

impl PageData {
    /// Declared `language` header, if it is a string.
    pub fn declared_language(&self) -> Option<&str> {
        meta_str(&self.meta, META_LANGUAGE)
    }

    /// Cross-language page id, if present and non-empty.
    pub fn pid(&self) -> Option<String> {
        meta_pid(&self.meta)
    }
}

/// A page enriched with its language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    #[serde(flatten)]
    pub data: PageData,
    /// Resolved language, always one of the available languages.
    pub language: LangCode,
    pub is_current_language: bool,
    pub pid: Option<String>,
    /// Date in the current language's format; empty without a decodable date.
    pub date_formatted: String,
}

impl Page {
    pub fn id(&self) -> &str {
        &self.data.id
    }
}

/// String value of a meta field.
pub fn meta_str<'a>(meta: &'a Meta, key: &str) -> Option<&'a str> {
    meta.get(key).and_then(Value::as_str)
}

/// Page id from meta: a non-empty string, or a number in its decimal form.
pub fn meta_pid(meta: &Meta) -> Option<String> {
    match meta.get(META_PID)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
