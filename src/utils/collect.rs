//! Content file discovery.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
pub const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Collect content files with the given extension (e.g. `".md"`), recursively.
///
/// Entries are visited in file-name order, so discovery order is stable
/// across platforms. Hidden files (leading `_` or `.`) and not-found pages
/// (`404<ext>`) are not part of the page list.
pub fn collect_content_files(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let not_found = format!("404{ext}");
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
                && !name.starts_with(['_', '.'])
                && name.ends_with(ext)
                && name != not_found
        })
        .map(|e| e.into_path())
        .collect()
}
