use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::enrollment::DEFAULT_ROLE;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub enrollment: EnrollmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// sqlite connection string for the token table.
    pub database_path: String,

    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrollmentConfig {
    /// Role shortname used when a token enrolls its user into a course.
    /// Must exist in the host or course/group dispatches fail as a
    /// configuration error.
    pub default_role: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/gatekey.db".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            default_role: DEFAULT_ROLE.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            enrollment: EnrollmentConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("general.database_path must not be empty");
        }
        if self.enrollment.default_role.trim().is_empty() {
            anyhow::bail!("enrollment.default_role must not be empty");
        }
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("gatekey").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".gatekey").join("config.toml"));
        }

        paths
    }
}
