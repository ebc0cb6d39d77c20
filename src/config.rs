//! Configuration handling for the panel
//!
//! Settings come from an optional `config.json` in the platform config
//! directory, overridden by environment variables. The Azure token is only
//! ever read from the environment.

use crate::backend::DEFAULT_BACKEND_URL;
use crate::host::{AzureHostConfig, WorkItemId};
use crate::panel::DEFAULT_REFRESH_DELAY;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_BACKEND_URL: &str = "STORYGEN_BACKEND_URL";
pub const ENV_BACKEND_TOKEN: &str = "STORYGEN_BACKEND_TOKEN";
pub const ENV_REFRESH_DELAY_MS: &str = "STORYGEN_REFRESH_DELAY_MS";
pub const ENV_EPIC_ID: &str = "STORYGEN_EPIC_ID";
pub const ENV_AZURE_ORG_URL: &str = "AZURE_ORG_URL";
pub const ENV_AZURE_PROJECT: &str = "AZURE_PROJECT";
pub const ENV_AZURE_TOKEN: &str = "AZURE_TOKEN";

/// User configuration file contents
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PanelConfig {
    /// Story backend base URL
    pub backend_url: Option<String>,
    /// Delay before refreshing the Epic after stories are created
    pub refresh_delay_ms: Option<u64>,
    /// Azure DevOps organization URL
    pub azure_org_url: Option<String>,
    /// Azure DevOps project
    pub azure_project: Option<String>,
    /// Epic to open the panel on
    pub epic_id: Option<u64>,
}

impl PanelConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "storygen", "epic-story-panel")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Directory for the log file
    pub fn log_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_local_dir().to_path_buf())
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let config: PanelConfig = serde_json::from_str(&content)
                    .with_context(|| format!("parsing {}", path.display()))?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }
}

/// Effective settings after applying defaults and environment overrides
#[derive(Debug, Clone)]
pub struct Settings {
    pub backend_url: String,
    pub backend_token: Option<String>,
    pub refresh_delay: Duration,
    pub azure: AzureHostConfig,
}

impl Settings {
    /// Resolve settings from the config file and the process environment
    pub fn resolve(config: PanelConfig) -> Result<Self> {
        Self::from_sources(config, |name| std::env::var(name).ok())
    }

    /// Resolve settings with an explicit environment lookup
    pub fn from_sources(config: PanelConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let refresh_delay = match var(ENV_REFRESH_DELAY_MS) {
            Some(raw) => Duration::from_millis(
                raw.trim()
                    .parse()
                    .with_context(|| format!("{ENV_REFRESH_DELAY_MS} must be milliseconds, got {raw:?}"))?,
            ),
            None => config
                .refresh_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REFRESH_DELAY),
        };

        let epic_id = match var(ENV_EPIC_ID) {
            Some(raw) => Some(
                raw.trim()
                    .parse()
                    .with_context(|| format!("{ENV_EPIC_ID} must be a work item id, got {raw:?}"))?,
            ),
            None => config.epic_id,
        };

        Ok(Self {
            backend_url: var(ENV_BACKEND_URL)
                .or(config.backend_url)
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            backend_token: var(ENV_BACKEND_TOKEN),
            refresh_delay,
            azure: AzureHostConfig {
                org_url: var(ENV_AZURE_ORG_URL).or(config.azure_org_url),
                project: var(ENV_AZURE_PROJECT).or(config.azure_project),
                token: var(ENV_AZURE_TOKEN),
                epic_id: epic_id.map(WorkItemId),
            },
        })
    }
}
