//! CLI implementation for `emberkit platform` commands

use anyhow::{Context, Result};

use crate::cli::output::{create_spinner, print_detail, print_success};
use crate::core::global_config::GlobalConfig;
use crate::core::platform::{self, InstallOutcome, PlatformPaths, UpdateOutcome};
use crate::infra::dirs::EmberkitDirs;

/// Resolve the effective platform locations from config and environment
fn platform_paths() -> Result<PlatformPaths> {
    let dirs = EmberkitDirs::new();
    let config = GlobalConfig::load(&dirs).context("Failed to load global config")?;
    Ok(PlatformPaths::from_environment(&dirs, &config))
}

/// Execute the platform install command
pub fn execute_install() -> Result<()> {
    let paths = platform_paths()?;

    let spinner = create_spinner(&format!("Installing platform from {}", paths.source_url));
    let outcome = platform::install(&paths);
    spinner.finish_and_clear();

    match outcome.context("Failed to install platform")? {
        InstallOutcome::AlreadyInstalled { path } => {
            print_success(&format!("Platform already installed at {}", path.display()));
        }
        InstallOutcome::Adopted { path } => {
            print_success(&format!(
                "Adopted existing platform checkout at {}",
                path.display()
            ));
        }
        InstallOutcome::Installed { path } => {
            print_success(&format!("Platform installed at {}", path.display()));
            print_detail(&format!("recorded in {}", paths.record_path.display()));
        }
    }

    Ok(())
}

/// Execute the platform update command
pub fn execute_update() -> Result<()> {
    let paths = platform_paths()?;

    let spinner = create_spinner("Updating platform");
    let outcome = platform::update(&paths);
    spinner.finish_and_clear();

    match outcome.context("Failed to update platform")? {
        UpdateOutcome::Updated { commit } => {
            print_success(&format!("Platform updated to {commit}"));
        }
        UpdateOutcome::AlreadyCurrent => {
            print_success("Platform already up to date");
        }
    }

    Ok(())
}
