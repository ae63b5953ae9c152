//! Template filter table.

use crate::{
    i18n::TranslateError,
    plugin::{Filter, FilterRegistry},
};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::fmt;

/// Filters registered for one request, by name.
#[derive(Default)]
pub struct FilterSet {
    filters: FxHashMap<String, Filter>,
}

impl FilterRegistry for FilterSet {
    fn add_filter(&mut self, name: &str, filter: Filter) {
        self.filters.insert(name.to_owned(), filter);
    }
}

impl FilterSet {
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Apply filter `name` to `input`. `None` if no such filter exists.
    pub fn apply(
        &self,
        name: &str,
        input: &str,
        args: &[Value],
    ) -> Option<Result<String, TranslateError>> {
        self.filters.get(name).map(|filter| filter(input, args))
    }

    /// Registered filter names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
