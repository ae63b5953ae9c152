//! Content localization: per-language date formatting and the language base
//! URL placeholder.

use super::{
    LanguageRegistry,
    locale::{LocaleGuard, parse_locale},
};
use chrono::{
    DateTime, FixedOffset, Locale, NaiveDate, NaiveDateTime,
    format::{Item, StrftimeItems},
};
use std::fmt::Write;

/// Placeholder replaced in raw page content before it is parsed.
pub const LANGUAGE_BASE_URL_PLACEHOLDER: &str = "%language_base_url%";

// ============================================================================
// Language Base URL
// ============================================================================

/// Site base URL qualified by a language.
///
/// `https://x/` + `fr` gives `https://x/fr` with URL rewriting and
/// `https://x?fr` without. Trailing slashes are trimmed.
pub fn language_base_url(base_url: &str, rewrite_url: bool, language: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let separator = if rewrite_url { '/' } else { '?' };
    let url = format!("{base}{separator}{language}");
    url.trim_end_matches('/').to_owned()
}

/// Replace every `%language_base_url%` in `content`.
///
/// Only this one token is recognized; everything else is left untouched.
pub fn substitute_placeholders(content: &str, language_base_url: &str) -> String {
    content.replace(LANGUAGE_BASE_URL_PLACEHOLDER, language_base_url)
}

// ============================================================================
// Date Formatting
// ============================================================================

/// Formats page dates for a language.
///
/// The locale is `[i18n.date_locales]` for the language, else the language
/// code itself; the format is `[i18n.date_formats]` for the language, else
/// the site-wide `[site.date_format]`.
#[derive(Debug, Clone, Copy)]
pub struct DateLocalizer<'a> {
    registry: &'a LanguageRegistry,
    default_format: &'a str,
}

impl<'a> DateLocalizer<'a> {
    pub fn new(registry: &'a LanguageRegistry, default_format: &'a str) -> Self {
        Self {
            registry,
            default_format,
        }
    }

    /// Locale used for `language`. Unknown locale names fall back to `POSIX`.
    pub fn locale_for(&self, language: &str) -> Locale {
        let name = self.registry.date_locale(language).unwrap_or(language);
        parse_locale(name).unwrap_or(Locale::POSIX)
    }

    /// strftime format used for `language`.
    pub fn format_for(&self, language: &str) -> &'a str {
        self.registry
            .date_format(language)
            .unwrap_or(self.default_format)
    }

    /// Format a raw page date for `language`.
    ///
    /// Returns `None` when the date cannot be decoded.
    pub fn format(&self, raw_date: &str, language: &str) -> Option<String> {
        let date = parse_date(raw_date)?;
        let format = self.format_for(language);

        let guard = LocaleGuard::acquire(self.locale_for(language));
        let mut formatted = String::new();
        write!(formatted, "{}", date.format_localized(format, guard.locale())).ok()?;
        Some(formatted)
    }
}

/// Decode a raw page date.
///
/// Accepted forms: RFC 3339, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM[:SS]`,
/// `YYYY-MM-DD`, `YYYY/MM/DD` and a Unix timestamp. Dates without an offset
/// are taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date);
    }

    if raw.bytes().all(|b| b.is_ascii_digit()) && raw.len() > 8 {
        let secs = raw.parse::<i64>().ok()?;
        return DateTime::from_timestamp(secs, 0).map(|d| d.fixed_offset());
    }

    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Some(naive.and_utc().fixed_offset())
}

/// Whether `format` is a strftime string chrono can render.
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

// ============================================================================
// Tests
// ============================================================================
