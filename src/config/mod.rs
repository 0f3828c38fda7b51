// Configuration module entry point
// Loads application configuration and builds the shared runtime state

mod env;
mod state;
mod types;

use std::net::SocketAddr;

pub use env::{DeployEnv, DistEnv, Stage};
pub use state::AppState;
pub use types::{AssetsConfig, Config, DeployConfig, LoggingConfig, RenderConfig, ServerConfig};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SSR")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("deploy.stage", "local")?
            .set_default("assets.dist_root", "static/dist")?
            .set_default("render.target", "vuessr")?
            .set_default("render.title", "SSR")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Deployment environment derived once from the `deploy` section
    pub fn deploy_env(&self) -> DeployEnv {
        DeployEnv::from(&self.deploy)
    }
}
