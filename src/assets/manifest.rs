//! Build manifest store
//!
//! A manifest maps logical entry names (`app.js`, `vendor.css`) to the
//! hashed file names the bundler emitted.

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::DistEnv;

/// Errors while loading build output; all of them are configuration errors
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Entry name to relative asset file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: HashMap<String, String>,
}

impl Manifest {
    pub fn get(&self, entry: &str) -> Option<&str> {
        self.entries.get(entry).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Source of build manifests and SSR bundle files
pub trait ManifestStore: Send + Sync {
    /// Asset manifest of `target` built for `env`
    fn manifest(&self, target: &str, env: DistEnv) -> Result<Manifest, ManifestError>;

    /// Server bundle consumed by the SSR renderer
    fn server_bundle(&self, target: &str) -> Result<Value, ManifestError>;

    /// Client manifest consumed by the SSR renderer
    fn client_manifest(&self, target: &str, env: DistEnv) -> Result<Value, ManifestError>;
}

/// Manifest store reading the bundler's output directory
///
/// Layout:
/// - `{root}/{target}/{env}/manifest.json`
/// - `{root}/{target}/{env}/vue-ssr-client-manifest.json`
/// - `{root}/{target}/server/vue-ssr-server-bundle.json`
#[derive(Debug, Clone)]
pub struct FsManifestStore {
    root: PathBuf,
}

impl FsManifestStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn env_dir(&self, target: &str, env: DistEnv) -> PathBuf {
        self.root.join(target).join(env.as_str())
    }
}

impl ManifestStore for FsManifestStore {
    fn manifest(&self, target: &str, env: DistEnv) -> Result<Manifest, ManifestError> {
        let path = self.env_dir(target, env).join("manifest.json");
        let entries: HashMap<String, String> = read_json(&path)?;
        Ok(Manifest { entries })
    }

    fn server_bundle(&self, target: &str) -> Result<Value, ManifestError> {
        read_json(
            &self
                .root
                .join(target)
                .join("server")
                .join("vue-ssr-server-bundle.json"),
        )
    }

    fn client_manifest(&self, target: &str, env: DistEnv) -> Result<Value, ManifestError> {
        read_json(&self.env_dir(target, env).join("vue-ssr-client-manifest.json"))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
