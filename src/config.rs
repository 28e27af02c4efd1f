//! Configuration types for modrinth-dl

use crate::error::{Error, Result};
use crate::types::{Loader, StabilityTier};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Registry endpoint configuration
///
/// The base URL is injected into [`RegistryClient`](crate::registry::RegistryClient)
/// at construction, so tests can point it at a mock server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Registry API root (default: "https://api.modrinth.com/v2")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (None = transport default)
    #[serde(default)]
    pub timeout: Option<Duration>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout: None,
        }
    }
}

/// Batch behaviour
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Packages resolved or fetched at the same time (default: 1, strictly sequential)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,

    /// Minimum stability tier when a job does not name one (default: any)
    #[serde(default)]
    pub minimum_tier: StabilityTier,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: default_max_concurrent(),
            minimum_tier: StabilityTier::Any,
        }
    }
}

/// Main configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Batch settings
    #[serde(default)]
    pub download: DownloadConfig,
}

impl Config {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.download.max_concurrent_downloads == 0 {
            return Err(Error::config(
                "max_concurrent_downloads",
                "must be at least 1",
            ));
        }
        if self.registry.base_url.trim().is_empty() {
            return Err(Error::config("base_url", "must not be empty"));
        }
        Ok(())
    }
}

/// One fully parameterised batch run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DownloadJob {
    /// Newline-delimited list of project identifiers
    #[serde(rename = "project-id-list")]
    pub source: PathBuf,

    /// Directory artifacts are written into (must already exist)
    #[serde(rename = "download-destination")]
    pub destination: PathBuf,

    /// Target game version, e.g. "1.20.1"
    #[serde(rename = "minecraft-version")]
    pub platform_version: String,

    /// Loader the releases must target
    #[serde(rename = "mod-loader")]
    pub loader: Loader,

    /// Least stable tier to accept; falls back to [`DownloadConfig::minimum_tier`]
    #[serde(rename = "minimum-version-type", default)]
    pub minimum_tier: Option<StabilityTier>,
}

/// Declarative list of jobs, run in listed order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobList {
    /// Jobs to run
    pub jobs: Vec<DownloadJob>,
}

impl JobList {
    /// Parse a YAML job-list document
    ///
    /// An unknown loader or tier id anywhere in the list fails the whole parse.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Read and parse a job-list file
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

fn default_base_url() -> String {
    "https://api.modrinth.com/v2".to_string()
}

fn default_user_agent() -> String {
    format!("modrinth-dl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_concurrent() -> usize {
    1
}
