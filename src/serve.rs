//! Development server.
//!
//! Serves the template variables of each requested page as JSON, built on
//! `tiny_http`:
//!
//! - One isolated request state per HTTP request, handled on the rayon pool
//! - `Accept-Language` feeds the browser language heuristic
//! - 404 status with the (possibly localized) not-found page
//! - Graceful shutdown on Ctrl+C
//!
//! ```text
//! ┌───────────────┐   incoming    ┌──────────────────────────┐
//! │  Main Thread  │ ────────────► │  rayon worker            │
//! │ (HTTP accept) │               │  begin_request → render  │
//! └───────────────┘               └──────────────────────────┘
//! ```

use crate::{config::SiteConfig, host, log, plugin::MultiLanguage};
use anyhow::{Context, Result, anyhow};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tiny_http::{Header, Request, Response, Server};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the server and block until Ctrl+C.
pub fn serve_site(config: &SiteConfig, plugin: MultiLanguage) -> Result<()> {
    let interface: std::net::IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", config.serve.interface))?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    let plugin = Arc::new(plugin);
    for request in server.incoming_requests() {
        let plugin = Arc::clone(&plugin);
        rayon::spawn(move || {
            if let Err(e) = handle_request(request, &plugin) {
                log!("serve"; "request error: {e}");
            }
        });
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// Render one HTTP request with its own request state.
fn handle_request(request: Request, plugin: &MultiLanguage) -> Result<()> {
    let url = page_fragment(request.url(), plugin.site().rewrite_url);
    let accept_language = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Accept-Language"))
        .map(|h| h.value.as_str().to_owned());

    let (status, body) = match host::render(plugin, &url, accept_language.as_deref()) {
        Ok(rendered) => {
            log!(
                "request";
                "{} /{} [{}]",
                rendered.status,
                rendered.request_url,
                rendered
                    .variables
                    .get("current_language")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
            );
            let body = json!({
                "status": rendered.status,
                "template": rendered.template,
                "variables": rendered.variables,
            });
            (rendered.status, serde_json::to_string_pretty(&body)?)
        }
        Err(e) => {
            log!("error"; "/{url}: {e:#}");
            let body = json!({ "status": 500, "error": format!("{e:#}") });
            (500, serde_json::to_string_pretty(&body)?)
        }
    };

    let response = Response::from_string(body)
        .with_status_code(status)
        .with_header(json_header()?);
    request.respond(response)?;
    Ok(())
}

fn json_header() -> Result<Header> {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .map_err(|_| anyhow!("Invalid Content-Type header"))
}

/// Page fragment of a request URL.
///
/// With URL rewriting the fragment is the decoded path. Without it, the path
/// is the first query parameter (`/?fr/about&x=1` → `fr/about`).
fn page_fragment(raw_url: &str, rewrite_url: bool) -> String {
    let (path, query) = raw_url.split_once('?').unwrap_or((raw_url, ""));
    let fragment = if !rewrite_url && path.trim_matches('/').is_empty() {
        let first = query.split('&').next().unwrap_or_default();
        first.split('=').next().unwrap_or_default()
    } else {
        path
    };

    urlencoding::decode(fragment)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| fragment.to_owned())
        .trim_matches('/')
        .to_owned()
}
