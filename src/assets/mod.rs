//! Asset path resolution
//!
//! Works out where the browser should load a build target's assets from.
//! While a target is compiled locally in watch mode its files are served
//! from `/runtime/{target}/`; every other case points at the published
//! build under `/dist/{target}/{env}/`.

mod manifest;

pub use manifest::{FsManifestStore, Manifest, ManifestError, ManifestStore};

use serde_json::Value;
use std::sync::Arc;

use crate::config::DeployEnv;

/// Asset information for one build target
#[derive(Debug, Clone)]
pub struct StaticBundleInfo {
    /// Public path prefix, always ends with `/`
    pub resource_url: String,
    /// Whether styles are shipped as separate css files
    pub is_extract_css: bool,
    manifest: Manifest,
}

impl StaticBundleInfo {
    /// Absolute URL of a manifest entry
    ///
    /// Returns `None` if the build did not emit the entry.
    pub fn entry_url(&self, entry: &str) -> Option<String> {
        self.manifest
            .get(entry)
            .map(|file| format!("{}{file}", self.resource_url))
    }

    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

/// Inputs for constructing a server-side bundle renderer
#[derive(Debug, Clone)]
pub struct BundleSources {
    pub server_bundle: Value,
    pub client_manifest: Value,
}

/// Resolves public paths and bundle information for build targets
#[derive(Clone)]
pub struct AssetResolver {
    env: DeployEnv,
    store: Arc<dyn ManifestStore>,
}

impl AssetResolver {
    pub fn new(env: DeployEnv, store: Arc<dyn ManifestStore>) -> Self {
        Self { env, store }
    }

    pub const fn env(&self) -> &DeployEnv {
        &self.env
    }

    /// Public path prefix for `target`
    pub fn public_path(&self, target: &str) -> String {
        if self.env.is_compiling(target) {
            format!("/runtime/{target}/")
        } else {
            format!("/dist/{target}/{}/", self.env.dist_env())
        }
    }

    /// Manifest-backed asset information for `target`
    ///
    /// A missing or unreadable manifest is a build configuration problem and
    /// is returned to the caller unchanged.
    pub fn static_bundle_info(&self, target: &str) -> Result<StaticBundleInfo, ManifestError> {
        let manifest = self.store.manifest(target, self.env.dist_env())?;
        Ok(StaticBundleInfo {
            resource_url: self.public_path(target),
            is_extract_css: !self.env.is_local(),
            manifest,
        })
    }

    /// Server bundle and client manifest for the SSR renderer of `target`
    pub fn bundle_sources(&self, target: &str) -> Result<BundleSources, ManifestError> {
        Ok(BundleSources {
            server_bundle: self.store.server_bundle(target)?,
            client_manifest: self.store.client_manifest(target, self.env.dist_env())?,
        })
    }
}

impl std::fmt::Debug for AssetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetResolver")
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DistEnv, Stage};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store recording which environments were requested
    #[derive(Default)]
    struct MemoryStore {
        manifests: HashMap<String, Manifest>,
        requested: Mutex<Vec<DistEnv>>,
    }

    impl ManifestStore for MemoryStore {
        fn manifest(&self, target: &str, env: DistEnv) -> Result<Manifest, ManifestError> {
            self.requested.lock().unwrap().push(env);
            self.manifests
                .get(target)
                .cloned()
                .ok_or_else(|| ManifestError::Read {
                    path: format!("{target}/{env}/manifest.json").into(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
        }

        fn server_bundle(&self, _target: &str) -> Result<Value, ManifestError> {
            Ok(serde_json::json!({"entry": "main.js"}))
        }

        fn client_manifest(&self, _target: &str, env: DistEnv) -> Result<Value, ManifestError> {
            Ok(serde_json::json!({"env": env.as_str()}))
        }
    }

    fn resolver(stage: Stage, compile_target: Option<&str>) -> AssetResolver {
        let mut store = MemoryStore::default();
        store.manifests.insert(
            "vuessr".to_string(),
            [
                ("app.js".to_string(), "app.91ab.js".to_string()),
                ("app.css".to_string(), "app.77cd.css".to_string()),
            ]
            .into_iter()
            .collect(),
        );
        AssetResolver::new(
            DeployEnv::new(stage, compile_target.map(String::from)),
            Arc::new(store),
        )
    }

    #[test]
    fn test_public_path_runtime_when_compiling_locally() {
        let r = resolver(Stage::Local, Some("vuessr"));
        assert_eq!(r.public_path("vuessr"), "/runtime/vuessr/");
        assert_eq!(r.public_path("admin"), "/dist/admin/dev/");
    }

    #[test]
    fn test_public_path_dist_per_stage() {
        assert_eq!(resolver(Stage::Local, None).public_path("vuessr"), "/dist/vuessr/dev/");
        assert_eq!(
            resolver(Stage::Dev, Some("vuessr")).public_path("vuessr"),
            "/dist/vuessr/dev/"
        );
        assert_eq!(resolver(Stage::Qa, None).public_path("vuessr"), "/dist/vuessr/qa/");
        assert_eq!(
            resolver(Stage::Prerelease, None).public_path("vuessr"),
            "/dist/vuessr/release/"
        );
        assert_eq!(
            resolver(Stage::Release, Some("vuessr")).public_path("vuessr"),
            "/dist/vuessr/release/"
        );
    }

    #[test]
    fn test_static_bundle_info_release() {
        let info = resolver(Stage::Release, None)
            .static_bundle_info("vuessr")
            .unwrap();
        assert_eq!(info.resource_url, "/dist/vuessr/release/");
        assert!(info.is_extract_css);
        assert_eq!(
            info.entry_url("app.js").as_deref(),
            Some("/dist/vuessr/release/app.91ab.js")
        );
        assert_eq!(info.entry_url("vendor.js"), None);
    }

    #[test]
    fn test_static_bundle_info_local_keeps_css_inline() {
        let info = resolver(Stage::Local, Some("vuessr"))
            .static_bundle_info("vuessr")
            .unwrap();
        assert!(!info.is_extract_css);
        assert_eq!(
            info.entry_url("app.css").as_deref(),
            Some("/runtime/vuessr/app.77cd.css")
        );
    }

    #[test]
    fn test_static_bundle_info_reads_dist_env_manifest() {
        let mut store = MemoryStore::default();
        store
            .manifests
            .insert("vuessr".to_string(), Manifest::default());
        let store = Arc::new(store);
        let r = AssetResolver::new(DeployEnv::new(Stage::Qa, None), store.clone());
        r.static_bundle_info("vuessr").unwrap();
        assert_eq!(*store.requested.lock().unwrap(), vec![DistEnv::Qa]);
    }

    #[test]
    fn test_static_bundle_info_missing_manifest_propagates() {
        let err = resolver(Stage::Release, None)
            .static_bundle_info("admin")
            .unwrap_err();
        assert!(matches!(err, ManifestError::Read { .. }));
    }

    #[test]
    fn test_bundle_sources() {
        let sources = resolver(Stage::Qa, None).bundle_sources("vuessr").unwrap();
        assert_eq!(sources.server_bundle["entry"], "main.js");
        assert_eq!(sources.client_manifest["env"], "qa");
    }
}
