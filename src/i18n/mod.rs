//! Language engine.
//!
//! | Module       | Role                                                    |
//! |--------------|---------------------------------------------------------|
//! | `registry`   | validated language settings, built once                 |
//! | `resolver`   | page-metadata and browser-preference resolution         |
//! | `index`      | pages by language and by cross-language id              |
//! | `localize`   | date formatting, language base URL placeholder          |
//! | `locale`     | scoped time locale used while formatting dates          |
//! | `catalog`    | per-language translation tables                         |
//! | `sprintf`    | printf-style formatting of translations                 |
//! | `context`    | template variables                                      |

pub mod catalog;
pub mod context;
mod error;
pub mod index;
pub mod locale;
pub mod localize;
mod page;
mod registry;
pub mod resolver;
pub mod sprintf;

pub use catalog::{Catalog, Translator};
pub use context::RenderContext;
pub use error::{RequestError, TranslateError};
pub use index::{PageIndex, filter_current};
pub use localize::{DateLocalizer, language_base_url};
pub use page::{META_LANGUAGE, META_PID, Meta, Page, PageData, meta_pid, meta_str};
pub use registry::{LangCode, LanguageRegistry};
pub use resolver::LanguageResolver;
