//! Server-side helpers for a server-rendered web application
//!
//! The core is a small facade:
//! - [`assets::AssetResolver`] derives public asset paths per deployment stage
//! - [`envelope::Envelope`] is the uniform `{code, message, data}` response
//! - [`request::RequestClient`] wraps outbound HTTP calls with timing hooks
//! - [`fs::list_subdirectories`] lists child directories without failing
//! - [`observers`] installs process-wide error observers
//!
//! Around it sit the configuration, logging, SSR glue and a page server.

pub mod assets;
pub mod build;
pub mod config;
pub mod envelope;
pub mod fs;
pub mod http;
pub mod logger;
pub mod observers;
pub mod render;
pub mod request;
pub mod server;
