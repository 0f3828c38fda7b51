//! Page request handling
//!
//! `GET`/`HEAD` requests render the configured target into a full HTML
//! document. `GET /api/health` answers with a JSON envelope describing the
//! deployment. Any other method gets a 405.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::envelope::Envelope;
use crate::http;
use crate::logger::RequestLogger;
use crate::render::{generate_ssr_data, render_document, SsrData};

/// Path of the health endpoint
pub const HEALTH_PATH: &str = "/api/health";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let url = req
        .uri()
        .path_and_query()
        .map_or_else(|| path.clone(), |pq| pq.as_str().to_string());
    let log = RequestLogger::new(method.as_str(), path.as_str());

    let is_head = method == Method::HEAD;
    if method != Method::GET && !is_head {
        return Ok(http::build_405_response());
    }

    if path == HEALTH_PATH {
        return Ok(health_response(&state));
    }

    // Built assets are served by the static host, never rendered
    if path.starts_with("/dist/") || path.starts_with("/runtime/") {
        return Ok(http::build_404_response());
    }

    let data = render_page(&state, &url, &log).await;
    let html = render_document(&state.config.render.title, &state.bundle, &state.plan, &data);
    Ok(http::build_html_response(html, is_head))
}

/// Run the renderer off the async workers; a crashed render falls back to
/// the default markup and is reported as an application error
async fn render_page(state: &Arc<AppState>, url: &str, log: &RequestLogger) -> SsrData {
    let renderer = Arc::clone(&state.renderer);
    let default_markup = state.config.render.default_markup.clone();
    let target_url = url.to_string();

    let fallback = default_markup.clone();
    match tokio::task::spawn_blocking(move || {
        generate_ssr_data(renderer.as_ref(), &target_url, &default_markup)
    })
    .await
    {
        Ok(data) => data,
        Err(e) => {
            state
                .observers
                .app_error(&format!("render task failed: {e}"), Some(log));
            SsrData {
                dom: fallback,
                state: None,
            }
        }
    }
}

fn health_response(state: &AppState) -> Response<Full<Bytes>> {
    let env = state.assets.env();
    let data = json!({
        "stage": env.stage(),
        "dist_env": env.dist_env().as_str(),
        "target": state.config.render.target,
        "public_path": state.bundle.resource_url,
        "extract_css": state.bundle.is_extract_css,
    });
    http::build_envelope_response(StatusCode::OK, &Envelope::success(data))
}
