//! Per-request page indexes.
//!
//! - by language: language → pages, in discovery order
//! - by id: page id → {language → page}, last write wins per `(pid, language)`
//!
//! Both are rebuilt for every request from the pages the host streams in.

use super::{LangCode, Page};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Translations of one logical page, keyed by language.
pub type Translations = IndexMap<LangCode, Arc<Page>>;

#[derive(Debug, Default)]
pub struct PageIndex {
    by_language: IndexMap<LangCode, Vec<Arc<Page>>>,
    by_id: FxHashMap<String, Translations>,
}

impl PageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enriched page to both indexes.
    pub fn insert(&mut self, page: Arc<Page>) {
        if let Some(pid) = &page.pid {
            self.by_id
                .entry(pid.clone())
                .or_default()
                .insert(page.language.clone(), Arc::clone(&page));
        }
        self.by_language
            .entry(page.language.clone())
            .or_default()
            .push(page);
    }

    /// Pages of `language`, in discovery order.
    pub fn by_language(&self, language: &str) -> &[Arc<Page>] {
        self.by_language
            .get(language)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All translations sharing `pid`.
    pub fn translations(&self, pid: &str) -> Option<&Translations> {
        self.by_id.get(pid)
    }

    /// Languages that have at least one page, in first-seen order.
    pub fn languages(&self) -> impl Iterator<Item = &LangCode> {
        self.by_language.keys()
    }

    /// Total number of indexed pages.
    pub fn len(&self) -> usize {
        self.by_language.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_language.is_empty()
    }
}

/// Keep only pages in the current language, preserving order.
pub fn filter_current(pages: &mut Vec<Arc<Page>>) {
    pages.retain(|page| page.is_current_language);
}
