use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::SETTINGS_FILE;

/// Expands environment variables in a string value.
/// Supports ${VAR} and $VAR syntax.
pub fn expand_env_vars(value: &str) -> Result<String> {
    shellexpand::env(value)
        .map(|s| s.into_owned())
        .map_err(|e| anyhow::anyhow!("Failed to expand environment variable in '{}': {}", value, e))
}

/// HTTP settings shared by every meta-API client.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ClientSettings {
    /// Request timeout. When unset the transport default applies.
    pub timeout_secs: Option<u64>,
    /// Proxy for all requests, may reference environment variables.
    pub proxy: Option<String>,
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl ClientSettings {
    pub fn from_file(settings_path: Option<&PathBuf>) -> Result<Self> {
        let path = settings_path
            .cloned()
            .unwrap_or_else(|| SETTINGS_FILE.as_path().to_path_buf());

        if !path.exists() {
            info!("No settings at {}, using defaults", path.display());
            return Ok(Self {
                path: Some(path),
                ..Self::default()
            });
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut settings = Self::from_str(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        settings.path = Some(path);
        Ok(settings)
    }

    pub fn from_str(settings: &str) -> Result<Self> {
        let settings: ClientSettings = toml::from_str(settings)?;
        info!(
            "Loaded settings: timeout_secs={:?}, proxy={}",
            settings.timeout_secs,
            settings.proxy.is_some()
        );
        Ok(settings)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
