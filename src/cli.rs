//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Polyglot multi-language site CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Config file name (default: polyglot.toml)
    #[arg(short = 'C', long, default_value = "polyglot.toml")]
    pub config: PathBuf,

    /// Override base URL for the site.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate the configuration and list the configured languages
    Check,

    /// Run a single request and print the template variables as JSON
    Render {
        /// Requested URL fragment, e.g. `fr/about` (empty for the site root)
        #[arg(default_value = "")]
        url: String,

        /// Value of the visitor's Accept-Language header
        #[arg(short, long)]
        accept_language: Option<String>,

        /// Translate a catalog key for the resolved language (extra values are format arguments)
        #[arg(short, long, num_args = 1.., value_name = "KEY [ARGS]...")]
        translate: Option<Vec<String>>,
    },

    /// Serve rendered template variables over HTTP, one isolated request state per request
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check)
    }
    pub const fn is_render(&self) -> bool {
        matches!(self.command, Commands::Render { .. })
    }
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}
