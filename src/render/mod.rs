//! Server-side rendering glue
//!
//! The renderer itself is an external collaborator behind [`Renderer`].
//! This module only runs it with a fresh context and falls back to default
//! markup when rendering fails.

mod document;

pub use document::render_document;

use serde_json::Value;
use thiserror::Error;

use crate::logger;

#[derive(Debug, Error)]
#[error("render failed: {0}")]
pub struct RenderError(pub String);

/// Per-render context handed to the renderer
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub url: String,
    /// Application state snapshot the renderer leaves for the client
    pub state: Option<Value>,
}

impl RenderContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: None,
        }
    }
}

/// Produces markup for a URL
pub trait Renderer: Send + Sync {
    fn render(&self, ctx: &mut RenderContext) -> Result<String, RenderError>;
}

/// Rendered markup plus the state snapshot taken while rendering
#[derive(Debug, Clone, PartialEq)]
pub struct SsrData {
    pub dom: String,
    pub state: Option<Value>,
}

/// Render `url`, using `default_dom` if the renderer fails
pub fn generate_ssr_data(renderer: &dyn Renderer, url: &str, default_dom: &str) -> SsrData {
    let mut ctx = RenderContext::new(url);
    let dom = match renderer.render(&mut ctx) {
        Ok(html) => html,
        Err(e) => {
            logger::log_render_fallback(url, &e);
            default_dom.to_string()
        }
    };
    SsrData {
        dom,
        state: ctx.state,
    }
}

/// Renderer that only emits the client mount point
///
/// Used when no JS engine is wired in; the page then renders on the client.
#[derive(Debug, Clone)]
pub struct ShellRenderer {
    mount_id: String,
}

impl ShellRenderer {
    pub fn new(mount_id: impl Into<String>) -> Self {
        Self {
            mount_id: mount_id.into(),
        }
    }
}

impl Default for ShellRenderer {
    fn default() -> Self {
        Self::new("app")
    }
}

impl Renderer for ShellRenderer {
    fn render(&self, ctx: &mut RenderContext) -> Result<String, RenderError> {
        ctx.state = Some(serde_json::json!({ "route": ctx.url }));
        Ok(format!(r#"<div id="{}"></div>"#, self.mount_id))
    }
}
