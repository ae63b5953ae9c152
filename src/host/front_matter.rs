//! TOML front-matter between `+++` lines.
//!
//! ```text
//! +++
//! title = "À propos"
//! Language = "fr"
//! pid = "about"
//! date = 2024-01-15
//! +++
//! Page body...
//! ```
//!
//! Keys are matched case-insensitively against the registered meta headers;
//! unregistered keys are kept under their lowercase name.

use crate::i18n::Meta;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde_json::Value;

const DELIMITER: &str = "+++";

/// Meta headers every page knows: meta name → front-matter key.
pub fn default_headers() -> IndexMap<String, String> {
    [
        ("title", "Title"),
        ("description", "Description"),
        ("author", "Author"),
        ("date", "Date"),
        ("robots", "Robots"),
        ("template", "Template"),
        ("hidden", "Hidden"),
    ]
    .into_iter()
    .map(|(id, name)| (id.to_owned(), name.to_owned()))
    .collect()
}

/// Split raw content into front-matter source and body.
///
/// Content without an opening `+++` line has no front-matter. An unclosed
/// block is treated as body.
pub fn split(raw: &str) -> (Option<&str>, &str) {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let Some(rest) = raw
        .strip_prefix(DELIMITER)
        .and_then(|rest| rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')))
    else {
        return (None, raw);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(front), body);
        }
        offset += line.len();
    }
    (None, raw)
}

/// Parse the front-matter of `raw` into meta.
///
/// Registered headers are stored under their meta name.
pub fn parse_meta(raw: &str, headers: &IndexMap<String, String>) -> Result<Meta> {
    let (front, _) = split(raw);
    let Some(front) = front else {
        return Ok(Meta::new());
    };
    let table: toml::Table = toml::from_str(front).context("Invalid front-matter")?;

    let mut meta: Meta = table
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), toml_to_json(value)))
        .collect();

    for (id, name) in headers {
        let name = name.to_lowercase();
        if name != *id
            && let Some(value) = meta.remove(&name)
        {
            meta.insert(id.clone(), value);
        }
    }
    Ok(meta)
}

/// Convert a TOML value to JSON. Datetimes become their RFC 3339 text.
pub fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
