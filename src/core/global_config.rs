//! Global configuration management
//!
//! Reads and manages global settings from `config.toml` in the config
//! directory: the organization namespace catalog names resolve into and
//! overrides for the platform source and checkout location.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infra::dirs::EmberkitDirs;

/// Global configuration error types
#[derive(Error, Debug)]
pub enum GlobalConfigError {
    /// Failed to read or write the config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse the config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Global configuration for emberkit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Platform settings
    #[serde(default)]
    pub platform: PlatformConfig,
}

/// Catalog configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Custom organization URL that short names resolve into
    pub org_url: Option<String>,

    /// Custom API base URL for catalog listing
    pub api_url: Option<String>,
}

/// Platform configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Custom platform source repository
    pub url: Option<String>,

    /// Custom location for the shared platform checkout
    pub path: Option<PathBuf>,
}

impl GlobalConfig {
    /// Load global configuration from the config directory
    ///
    /// A missing file yields the defaults; an invalid file is an error.
    pub fn load(dirs: &EmberkitDirs) -> Result<Self, GlobalConfigError> {
        Self::load_from_path(&dirs.global_config_path())
    }

    /// Load global configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, GlobalConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| GlobalConfigError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| GlobalConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Save global configuration to a specific path
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to_path(&self, path: &Path) -> Result<(), GlobalConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| GlobalConfigError::ReadError {
                path: parent.display().to_string(),
                error: e.to_string(),
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| GlobalConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        fs::write(path, content).map_err(|e| GlobalConfigError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Effective organization URL for catalog resolution
    #[must_use]
    pub fn org_url(&self) -> &str {
        self.catalog
            .org_url
            .as_deref()
            .unwrap_or(crate::config::urls::ORG_URL)
    }

    /// Effective API base URL for catalog listing
    #[must_use]
    pub fn api_url(&self) -> &str {
        self.catalog
            .api_url
            .as_deref()
            .unwrap_or(crate::config::urls::GITHUB_API)
    }

    /// Effective platform source repository
    #[must_use]
    pub fn platform_url(&self) -> &str {
        self.platform
            .url
            .as_deref()
            .unwrap_or(crate::config::urls::PLATFORM_REPO)
    }
}
