use std::path::{Path, PathBuf};
use serde::Deserialize;
use anyhow::{Context, Result};
use shared::protocol::{DEFAULT_LIST_FILE, DEFAULT_LOG_FILE};
use shared::types::ApplyMode;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "comment-updater.toml";

/// Environment variable that switches a run to live mode
pub const LIVE_ENV: &str = "COMMENT_UPDATER_LIVE";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub updater: UpdaterConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdaterConfig {
    #[serde(default = "default_list_path")]
    pub list_path: PathBuf,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    /// Persist comment changes. Off unless the operator opts in.
    #[serde(default)]
    pub live: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceBackend {
    #[default]
    Powershell,
    Snapshot,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub backend: ServiceBackend,
    /// Shell used by the powershell backend ("powershell" or "pwsh")
    #[serde(default = "default_program")]
    pub program: String,
    /// Remote print server; the local host when unset
    #[serde(default)]
    pub computer_name: Option<String>,
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

fn default_list_path() -> PathBuf {
    PathBuf::from(DEFAULT_LIST_FILE)
}

fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_program() -> String {
    "powershell".to_string()
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("inventory.json")
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            list_path: default_list_path(),
            log_path: default_log_path(),
            live: false,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: ServiceBackend::default(),
            program: default_program(),
            computer_name: None,
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load an explicitly named file, or the default file if it exists,
    /// or fall back to built-in defaults.
    pub fn resolve(explicit: Option<&str>) -> Result<(Self, Option<PathBuf>)> {
        match explicit {
            Some(path) => Ok((Self::load(path)?, Some(PathBuf::from(path)))),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Ok((
                Self::load(DEFAULT_CONFIG_FILE)?,
                Some(PathBuf::from(DEFAULT_CONFIG_FILE)),
            )),
            None => Ok((Self::default(), None)),
        }
    }

    /// Dry run unless the file or the environment opts in
    pub fn apply_mode(&self, live_env: Option<&str>) -> ApplyMode {
        let env_live = matches!(
            live_env.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("1" | "true" | "yes")
        );
        ApplyMode::from_live(self.updater.live || env_live)
    }
}
