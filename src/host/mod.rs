//! Flat-file host driving the language hooks.
//!
//! Discovers pages under the content directory, parses their TOML
//! front-matter and runs a request through the hooks in order. Rendering
//! stops at the template variables; no template engine is bundled.

pub mod filters;
pub mod front_matter;
pub mod pages;
pub mod pipeline;

pub use filters::FilterSet;
pub use pipeline::{Rendered, render};
