//! Configuration loading and the SCM host registry
//!
//! Precedence: environment > config file > built-in defaults.

pub mod loader;
pub mod registry;

pub use loader::{default_config_path, init_config, load_config, ConfigFormat, LoadedConfig};
pub use registry::HostRegistry;

use crate::domain::{HostPolicy, Provider};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root for clones when a host has no `home_dir` of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<PathBuf>,

    #[serde(default)]
    pub hosts: Vec<HostPolicy>,

    #[serde(default)]
    pub clone: CloneSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneSettings {
    /// Extra "repository not found" phrasings, matched case-insensitively.
    #[serde(default)]
    pub not_found_patterns: Vec<String>,

    /// Draw the live progress view while cloning.
    #[serde(default = "default_true")]
    pub progress: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CloneSettings {
    fn default() -> Self {
        Self { not_found_patterns: Vec::new(), progress: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        let host = |hostname: &str, provider| HostPolicy {
            always_create_dir_hierarchy: true,
            include_host_in_dir_hierarchy: true,
            ..HostPolicy::new(hostname, provider)
        };
        Self {
            home_dir: Some(PathBuf::from("~/scm")),
            hosts: vec![
                host("github.com", Provider::GitHub),
                host("gitlab.com", Provider::GitLab),
                host("bitbucket.org", Provider::BitBucketCloud),
            ],
            clone: CloneSettings::default(),
        }
    }
}

impl Config {
    /// Build the registry of configured hosts, rejecting duplicates.
    pub fn registry(&self) -> crate::error::Result<HostRegistry> {
        HostRegistry::new(self.hosts.clone())
    }
}
