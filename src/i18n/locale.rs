//! Scoped time locale.
//!
//! Date formatting reads the active time locale of the current thread. A
//! [`LocaleGuard`] sets it for the duration of one formatting call and puts
//! the previous value back when dropped, on every exit path including
//! unwinding. Other threads never observe it.
//!
//! ```ignore
//! let guard = LocaleGuard::acquire(Locale::fr_FR);
//! let text = date.format_localized("%A", guard.locale()).to_string();
//! // guard dropped: the thread is back on its previous locale
//! ```

use chrono::Locale;
use std::{cell::Cell, marker::PhantomData};

thread_local! {
    static TIME_LOCALE: Cell<Locale> = const { Cell::new(Locale::POSIX) };
}

/// The time locale currently active on this thread.
pub fn current() -> Locale {
    TIME_LOCALE.get()
}

/// Restores the previous time locale when dropped.
///
/// Not `Send`: the guard must be dropped on the thread that acquired it.
#[must_use = "the locale is restored as soon as the guard is dropped"]
pub struct LocaleGuard {
    locale: Locale,
    previous: Locale,
    _not_send: PhantomData<*const ()>,
}

impl LocaleGuard {
    /// Make `locale` the active time locale until the guard is dropped.
    pub fn acquire(locale: Locale) -> Self {
        let previous = TIME_LOCALE.replace(locale);
        Self {
            locale,
            previous,
            _not_send: PhantomData,
        }
    }

    /// The locale held by this guard.
    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl Drop for LocaleGuard {
    fn drop(&mut self) {
        TIME_LOCALE.set(self.previous);
    }
}

/// Parse a locale name into a known locale.
///
/// Accepts `fr_FR`, `fr-FR`, `fr_FR.UTF-8`, `fr_FR@euro` and a bare language
/// code (`fr` → `fr_FR`). Returns `None` for anything unknown.
pub fn parse_locale(name: &str) -> Option<Locale> {
    let name = name
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim()
        .replace('-', "_");
    if name.is_empty() {
        return None;
    }

    if let Ok(locale) = Locale::try_from(name.as_str()) {
        return Some(locale);
    }

    // Normalize casing: language lowercase, territory uppercase
    let expanded = match name.split_once('_') {
        Some((lang, territory)) => format!(
            "{}_{}",
            lang.to_ascii_lowercase(),
            territory.to_ascii_uppercase()
        ),
        None => format!(
            "{}_{}",
            name.to_ascii_lowercase(),
            name.to_ascii_uppercase()
        ),
    };
    Locale::try_from(expanded.as_str()).ok()
}
