// Application state module
// Everything the page server needs, built once at startup and shared via Arc

use std::sync::Arc;

use super::types::Config;
use crate::assets::{AssetResolver, FsManifestStore, ManifestError, StaticBundleInfo};
use crate::build::BuildPlan;
use crate::observers::ErrorObservers;
use crate::render::Renderer;

/// Application state
pub struct AppState {
    pub config: Config,
    pub assets: AssetResolver,
    /// Bundle info of the rendered target, resolved at startup
    pub bundle: StaticBundleInfo,
    pub plan: BuildPlan,
    pub renderer: Arc<dyn Renderer>,
    pub observers: ErrorObservers,
}

impl AppState {
    /// Build state from configuration
    ///
    /// Fails if the rendered target's manifest cannot be loaded; the server
    /// must not start with broken asset references.
    pub fn new(
        config: &Config,
        renderer: Arc<dyn Renderer>,
        observers: ErrorObservers,
    ) -> Result<Self, ManifestError> {
        let store = Arc::new(FsManifestStore::new(&config.assets.dist_root));
        let assets = AssetResolver::new(config.deploy_env(), store);
        let bundle = assets.static_bundle_info(&config.render.target)?;

        Ok(Self {
            config: config.clone(),
            assets,
            bundle,
            plan: BuildPlan::standard(),
            renderer,
            observers,
        })
    }
}
