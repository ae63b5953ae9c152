//! Polyglot - multi-language content engine for flat-file sites.

use anyhow::{Result, bail};
use clap::Parser;
use polyglot::{
    cli::{Cli, Commands},
    config::SiteConfig,
    host, log,
    plugin::{MultiLanguage, TRANSLATE_FILTER},
    serve::serve_site,
};
use serde_json::{Value, json};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SiteConfig::load(&cli)?;
    let plugin = MultiLanguage::on_config_loaded(&config)?;

    match &cli.command {
        Commands::Check => check(&plugin),
        Commands::Render {
            url,
            accept_language,
            translate,
        } => render(
            &plugin,
            url,
            accept_language.as_deref(),
            translate.as_deref(),
        ),
        Commands::Serve { .. } => serve_site(&config, plugin),
    }
}

/// Report the configured languages and their catalogs.
fn check(plugin: &MultiLanguage) -> Result<()> {
    let registry = plugin.registry();
    let mut missing = 0;

    for (code, name) in registry.languages() {
        let default = if code == registry.default_language() {
            " (default)"
        } else {
            ""
        };
        let catalog = registry.catalog_path(code);
        let title = registry.site_title(code).unwrap_or(&plugin.site().title);
        log!("check"; "{code}: {name}{default}, title `{title}`");

        if !catalog.is_file() {
            missing += 1;
            log!("error"; "missing translation catalog `{}`", catalog.display());
        }
    }

    if missing > 0 {
        bail!("{missing} translation catalog(s) missing");
    }
    log!("check"; "ok");
    Ok(())
}

/// Render one request and print its template variables as JSON.
fn render(
    plugin: &MultiLanguage,
    url: &str,
    accept_language: Option<&str>,
    translate: Option<&[String]>,
) -> Result<()> {
    let rendered = host::render(plugin, url, accept_language)?;

    let Some([key, args @ ..]) = translate else {
        let output = json!({
            "status": rendered.status,
            "template": rendered.template,
            "variables": rendered.variables,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    };

    // Arguments that parse as JSON keep their type ("3" is a number)
    let args: Vec<Value> = args
        .iter()
        .map(|arg| serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.clone())))
        .collect();
    match rendered.filters.apply(TRANSLATE_FILTER, key, &args) {
        Some(translated) => println!("{}", translated?),
        None => bail!("`{TRANSLATE_FILTER}` filter is not registered"),
    }
    Ok(())
}
