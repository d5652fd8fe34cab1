//! Settings configuration
//!
//! TOML-based settings for sshcfg.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ssh_config::store::{ConfigStore, DEFAULT_FILE_MODE};

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Managed SSH config file
    pub ssh: SshSettings,
}

/// Where the SSH config lives and how it is written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SshSettings {
    /// SSH client config file, `~` is expanded
    pub config_path: String,
    /// Copy of the previous contents, written before every save
    pub backup_path: String,
    /// Permission bits for both files
    pub file_mode: u32,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            config_path: "~/.ssh/config".to_string(),
            backup_path: "~/.ssh/.config.backup".to_string(),
            file_mode: DEFAULT_FILE_MODE,
        }
    }
}

impl SshSettings {
    /// Manage a different config file, backed up next to it
    pub fn with_config_path(mut self, path: &str) -> Self {
        let expanded = expand(path);
        let file_name = expanded
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config".to_string());
        self.backup_path = expanded
            .with_file_name(format!(".{}.backup", file_name))
            .to_string_lossy()
            .into_owned();
        self.config_path = path.to_string();
        self
    }

    /// Build the store for the configured paths
    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(
            expand(&self.config_path),
            expand(&self.backup_path),
            self.file_mode,
        )
    }
}

impl Settings {
    /// Load settings from file
    pub fn load(custom_path: Option<&str>) -> Result<Self> {
        let path = if let Some(p) = custom_path {
            expand(p)
        } else {
            Self::default_config_path()
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .context(format!("Failed to read config file: {:?}", path))?;
            let settings: Settings =
                toml::from_str(&content).context("Failed to parse config file")?;
            Ok(settings)
        } else {
            // Return defaults if no config exists
            Ok(Self::default())
        }
    }

    /// Get default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("sshcfg").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("~/.config/sshcfg/config.toml"))
    }

    /// Save settings to file
    pub fn save(&self, path: Option<&str>) -> Result<PathBuf> {
        let path = if let Some(p) = path {
            expand(p)
        } else {
            Self::default_config_path()
        };

        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(path)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
