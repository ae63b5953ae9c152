//! One request through the page pipeline.
//!
//! ```text
//! url ──► on_request_url ──► resolve file ──┬─► found: read
//!                                           └─► missing: 404 ──► on_404_content_loaded
//!     ──► meta headers ──► parse meta ──► on_meta_parsed
//!     ──► on_content_prepared
//!     ──► load pages ──► on_single_page_loaded (each) ──► sort ──► on_pages_loaded
//!     ──► on_page_rendering ──► on_template_engine_ready
//! ```

use super::{
    filters::FilterSet,
    front_matter::{self, default_headers},
    pages::{load_pages, page_id, sort_by_id},
};
use crate::plugin::{MultiLanguage, SiteSettings};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Raw content used when no 404 page exists.
const DEFAULT_NOT_FOUND: &str =
    "+++\ntitle = \"Error 404\"\n+++\nWoops. Looks like this page doesn't exist.\n";

/// Template used when a page does not name one.
const DEFAULT_TEMPLATE: &str = "index";

/// Result of one request.
#[derive(Debug)]
pub struct Rendered {
    /// HTTP status: 200, or 404 for a missing page.
    pub status: u16,
    /// URL fragment after rewriting.
    pub request_url: String,
    pub template: String,
    pub variables: Map<String, Value>,
    /// Filters available to the template.
    pub filters: FilterSet,
}

impl Rendered {
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Run one request for `url` through every hook.
///
/// `accept_language` is the visitor's raw `Accept-Language` header.
pub fn render(
    plugin: &MultiLanguage,
    url: &str,
    accept_language: Option<&str>,
) -> Result<Rendered> {
    let settings = plugin.site();
    let mut request = plugin.begin_request(accept_language);

    let mut request_url = url.trim_matches('/').to_owned();
    request.on_request_url(&mut request_url);

    let (status, request_file, raw_content) = match resolve_request_file(settings, &request_url) {
        Some(file) if file.is_file() => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            (200, file, raw)
        }
        file => {
            let file = file.unwrap_or_else(|| {
                settings
                    .content_dir
                    .join(format!("404{}", settings.content_ext))
            });
            let mut raw = read_not_found(settings, &file)?;
            request.on_404_content_loaded(&file, &mut raw);
            (404, file, raw)
        }
    };

    let mut headers = default_headers();
    plugin.on_meta_headers(&mut headers);

    let mut meta = front_matter::parse_meta(&raw_content, &headers)
        .with_context(|| format!("In {}", request_file.display()))?;
    request.on_meta_parsed(&mut meta);

    let (_, body) = front_matter::split(&raw_content);
    let mut content = body.to_owned();
    request.on_content_prepared(&mut content)?;

    let mut pages = Vec::new();
    for data in load_pages(settings, &headers)? {
        pages.push(request.on_single_page_loaded(data)?);
    }
    sort_by_id(&mut pages, |page| page.id());
    request.on_pages_loaded(&mut pages);

    let current_id = page_id(&request_file, settings).ok();
    let current_page = current_id
        .as_deref()
        .and_then(|id| pages.iter().find(|page| page.id() == id))
        .map(|page| serde_json::to_value(page.as_ref()))
        .transpose()?
        .unwrap_or(Value::Null);

    let mut template = meta
        .get("template")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_TEMPLATE)
        .to_owned();

    let mut variables = Map::new();
    variables.insert("site_title".into(), Value::String(settings.title.clone()));
    variables.insert("base_url".into(), Value::String(settings.base_url.clone()));
    variables.insert("rewrite_url".into(), Value::Bool(settings.rewrite_url));
    variables.insert("request_url".into(), Value::String(request_url.clone()));
    variables.insert("meta".into(), Value::Object(meta));
    variables.insert("content".into(), Value::String(content));
    variables.insert("pages".into(), serde_json::to_value(&pages)?);
    variables.insert("current_page".into(), current_page);

    request.on_page_rendering(&mut template, &mut variables)?;

    let mut filters = FilterSet::default();
    request.on_template_engine_ready(&mut filters)?;

    Ok(Rendered {
        status,
        request_url,
        template,
        variables,
        filters,
    })
}

/// Content file of a URL fragment: `<url><ext>`, else `<url>/index<ext>`.
///
/// `None` for fragments escaping the content directory.
fn resolve_request_file(settings: &SiteSettings, url: &str) -> Option<PathBuf> {
    let relative = Path::new(url);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let ext = &settings.content_ext;
    if url.is_empty() {
        return Some(settings.content_dir.join(format!("index{ext}")));
    }
    let file = settings.content_dir.join(format!("{url}{ext}"));
    let index = settings.content_dir.join(url).join(format!("index{ext}"));
    if !file.is_file() && index.is_file() {
        Some(index)
    } else {
        Some(file)
    }
}

/// Closest `404<ext>` from the requested file's directory up to the content
/// root, or the built-in not-found page.
fn read_not_found(settings: &SiteSettings, request_file: &Path) -> Result<String> {
    let name = format!("404{}", settings.content_ext);
    let candidate = request_file
        .ancestors()
        .skip(1)
        .take_while(|dir| dir.starts_with(&settings.content_dir))
        .map(|dir| dir.join(&name))
        .find(|file| file.is_file());

    match candidate {
        Some(file) => {
            fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))
        }
        None => Ok(DEFAULT_NOT_FOUND.to_owned()),
    }
}

// ============================================================================
// Tests
// ============================================================================
