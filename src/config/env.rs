//! Deployment environment selection
//!
//! The stage comes from configuration once at startup. Everything that
//! depends on it (asset prefixes, css extraction) reads it from a
//! [`DeployEnv`] passed in by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::DeployConfig;

/// Deployment stage of the running process
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Local,
    Dev,
    Qa,
    Prerelease,
    Release,
}

/// Distribution environment segment used in `/dist/{target}/{env}/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistEnv {
    Dev,
    Qa,
    Release,
}

impl DistEnv {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Qa => "qa",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for DistEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Stage {
    /// Local and dev share the dev build, qa has its own, everything else
    /// ships the release build.
    pub const fn dist_env(self) -> DistEnv {
        match self {
            Self::Local | Self::Dev => DistEnv::Dev,
            Self::Qa => DistEnv::Qa,
            Self::Prerelease | Self::Release => DistEnv::Release,
        }
    }
}

/// Immutable view of the deployment environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployEnv {
    stage: Stage,
    compile_target: Option<String>,
    dist_env: DistEnv,
}

impl DeployEnv {
    pub fn new(stage: Stage, compile_target: Option<String>) -> Self {
        Self {
            stage,
            compile_target,
            dist_env: stage.dist_env(),
        }
    }

    pub const fn stage(&self) -> Stage {
        self.stage
    }

    pub const fn dist_env(&self) -> DistEnv {
        self.dist_env
    }

    pub fn compile_target(&self) -> Option<&str> {
        self.compile_target.as_deref()
    }

    pub const fn is_local(&self) -> bool {
        matches!(self.stage, Stage::Local)
    }

    /// True when `target` is being compiled on this machine right now
    pub fn is_compiling(&self, target: &str) -> bool {
        self.is_local() && self.compile_target() == Some(target)
    }
}

impl From<&DeployConfig> for DeployEnv {
    fn from(cfg: &DeployConfig) -> Self {
        Self::new(cfg.stage, cfg.compile_target.clone())
    }
}
