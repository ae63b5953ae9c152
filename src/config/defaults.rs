//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    use std::path::PathBuf;

    pub fn base_url() -> Option<String> {
        None
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn content_ext() -> String {
        ".md".into()
    }

    /// Same default as the host runtime (`%D %T` → `01/15/24 10:30:00`).
    pub fn date_format() -> String {
        "%D %T".into()
    }
}

// ============================================================================
// [i18n] Section Defaults
// ============================================================================

pub mod i18n {
    pub const DEFAULT_LANGUAGE: &str = "en";

    pub const LANGUAGE_DIR: &str = "language";

    /// Used when `[i18n.languages]` is omitted entirely.
    pub const LANGUAGES: &[(&str, &str)] = &[("en", "English")];
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}
