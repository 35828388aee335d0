//! Platform-specific directory management
//!
//! Provides the config and data directories emberkit persists state in.
//! Follows XDG Base Directory Specification on Linux and standard
//! locations on macOS.
//!
//! Environment variables can override default directories:
//! - `EMBERKIT_CONFIG_DIR` - Override config directory
//! - `EMBERKIT_DATA_DIR` - Override data directory

use std::env;
use std::path::PathBuf;

use crate::config::defaults::{GLOBAL_CONFIG_FILE, PLATFORM_CHECKOUT_DIR, PLATFORM_RECORD_FILE};

/// Environment variable names for directory overrides
pub const ENV_CONFIG_DIR: &str = "EMBERKIT_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "EMBERKIT_DATA_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "emberkit";

/// Directory provider for emberkit's persisted state
///
/// The config directory holds the global config and the platform record;
/// the data directory is the default home of the shared platform checkout.
#[derive(Debug, Clone)]
pub struct EmberkitDirs {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl EmberkitDirs {
    /// Create a new `EmberkitDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
            data_dir: Self::resolve_data_dir(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/emberkit` or `~/.config/emberkit`
    /// - macOS: `~/Library/Application Support/emberkit`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the data directory path
    ///
    /// - Linux: `$XDG_DATA_HOME/emberkit` or `~/.local/share/emberkit`
    /// - macOS: `~/Library/Application Support/emberkit`
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    /// Path of the persisted platform record
    #[must_use]
    pub fn platform_record_path(&self) -> PathBuf {
        self.config_dir.join(PLATFORM_RECORD_FILE)
    }

    /// Default location of the shared platform checkout
    #[must_use]
    pub fn platform_checkout_dir(&self) -> PathBuf {
        self.data_dir.join(PLATFORM_CHECKOUT_DIR)
    }

    /// Path of the global config file
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join(GLOBAL_CONFIG_FILE)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }

    fn resolve_data_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_DATA_DIR) {
            return PathBuf::from(path);
        }

        dirs::data_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".local").join("share").join(APP_NAME))
                    .unwrap_or_else(|| {
                        PathBuf::from(".")
                            .join(".local")
                            .join("share")
                            .join(APP_NAME)
                    })
            })
    }
}

impl Default for EmberkitDirs {
    fn default() -> Self {
        Self::new()
    }
}
