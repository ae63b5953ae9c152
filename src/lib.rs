//! Polyglot - multi-language content engine for flat-file sites.
//!
//! Resolves the language of each request, indexes pages by language and by
//! cross-language id, localizes dates and translates UI strings. A small
//! flat-file host drives the engine through its lifecycle hooks.

pub mod cli;
pub mod config;
pub mod host;
pub mod i18n;
pub mod plugin;
pub mod serve;
pub mod utils;
