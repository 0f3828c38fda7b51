// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

use super::env::Stage;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub deploy: DeployConfig,
    pub assets: AssetsConfig,
    pub render: RenderConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written: error, warn, info or debug
    pub level: String,
    /// Info log file path (optional, stdout if not set)
    #[serde(default)]
    pub info_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Deployment stage and the bundle currently compiled in watch mode
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    pub stage: Stage,
    /// Target served from `/runtime/` while developing locally
    #[serde(default)]
    pub compile_target: Option<String>,
}

/// Build output location
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssetsConfig {
    /// Directory holding `{target}/{env}/manifest.json` and the server bundles
    pub dist_root: String,
}

/// Page rendering configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RenderConfig {
    /// Build target whose bundle renders the pages
    pub target: String,
    pub title: String,
    /// Markup sent when rendering fails
    #[serde(default = "default_markup")]
    pub default_markup: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_markup() -> String {
    r#"<div id="app"></div>"#.to_string()
}
