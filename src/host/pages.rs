//! Page discovery and loading.

use super::front_matter::parse_meta;
use crate::{
    i18n::{Meta, PageData},
    plugin::SiteSettings,
    utils::collect::collect_content_files,
};
use anyhow::{Context, Result, anyhow};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde_json::Value;
use std::{fs, path::Path};

/// Page id of a content file: path relative to the content dir, without
/// extension, with `/` separators.
///
/// `content/fr/about.md` → `fr/about`
pub fn page_id(path: &Path, settings: &SiteSettings) -> Result<String> {
    let relative = path
        .strip_prefix(&settings.content_dir)
        .map_err(|_| anyhow!("File is not in content directory: {}", path.display()))?
        .to_str()
        .ok_or_else(|| anyhow!("Invalid path encoding: {}", path.display()))?
        .replace('\\', "/");
    let id = relative
        .strip_suffix(settings.content_ext.as_str())
        .unwrap_or(&relative);
    Ok(id.to_owned())
}

/// Public URL of a page id.
///
/// `index` pages collapse onto their directory. Without URL rewriting the
/// path goes into the query string.
pub fn page_url(id: &str, settings: &SiteSettings) -> String {
    let path = if id == "index" {
        ""
    } else {
        id.strip_suffix("/index").unwrap_or(id)
    };
    let path = path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    match (path.is_empty(), settings.rewrite_url) {
        (true, _) => settings.base_url.clone(),
        (false, true) => format!("{}{path}", settings.base_url),
        (false, false) => format!("{}?{path}", settings.base_url),
    }
}

/// Read and parse one content file.
pub fn load_page(
    path: &Path,
    settings: &SiteSettings,
    headers: &IndexMap<String, String>,
) -> Result<PageData> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let meta = parse_meta(&raw, headers).with_context(|| format!("In {}", path.display()))?;
    let id = page_id(path, settings)?;

    Ok(PageData {
        url: page_url(&id, settings),
        title: meta_text(&meta, "title").unwrap_or_default(),
        date: meta_text(&meta, "date"),
        meta,
        id,
    })
}

/// Load every page of the content directory, in discovery order.
///
/// Files are parsed in parallel; any failure aborts the load.
pub fn load_pages(
    settings: &SiteSettings,
    headers: &IndexMap<String, String>,
) -> Result<Vec<PageData>> {
    let files = collect_content_files(&settings.content_dir, &settings.content_ext);
    files
        .par_iter()
        .map(|path| load_page(path, settings, headers))
        .collect()
}

/// Scalar meta value as text.
fn meta_text(meta: &Meta, key: &str) -> Option<String> {
    match meta.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Sort pages alphabetically by id.
pub fn sort_by_id<T>(pages: &mut [T], id: impl Fn(&T) -> &str) {
    pages.sort_by(|a, b| id(a).cmp(id(b)));
}
