//! CLI implementation for `emberkit package` commands

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{create_spinner, print_detail, print_info, print_success};
use crate::config::urls;
use crate::core::global_config::GlobalConfig;
use crate::core::package::{self, InstallRequest};
use crate::infra::dirs::EmberkitDirs;
use crate::registry::client::CatalogClient;

fn load_config() -> Result<GlobalConfig> {
    let dirs = EmberkitDirs::new();
    GlobalConfig::load(&dirs).context("Failed to load global config")
}

/// Execute the package install command
pub fn execute_install(dir: &Path, spec: &str, tag: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let request = InstallRequest {
        spec,
        tag,
        org_url: config.org_url(),
    };

    let spinner = create_spinner(&format!("Installing package: {spec}"));
    let result = package::install(dir, &request);
    spinner.finish_and_clear();

    let result = result.with_context(|| format!("Failed to install package '{spec}'"))?;

    if result.resumed {
        print_success(&format!("Relinked existing checkout of {}", result.name));
    } else {
        print_success(&format!("Installed {} from {}", result.name, result.url));
    }
    print_detail(&format!("checkout: {}", result.package_path.display()));
    print_detail(&format!("library:  {}", result.library_path.display()));

    Ok(())
}

/// Execute the package remove command
pub fn execute_remove(dir: &Path, name: &str) -> Result<()> {
    package::remove(dir, name).with_context(|| format!("Failed to remove package '{name}'"))?;

    print_success(&format!("Removed {name}"));
    Ok(())
}

/// Execute the package list command
pub fn execute_list(dir: &Path, installed: bool) -> Result<()> {
    if installed {
        let names = package::list_installed(dir).context("Failed to list installed packages")?;
        if names.is_empty() {
            print_info("No packages installed");
        } else {
            for name in names {
                println!("{name}");
            }
        }
        return Ok(());
    }

    let config = load_config()?;
    let org = urls::org_name(config.org_url()).to_string();

    let client = CatalogClient::new(config.api_url())?;
    let spinner = create_spinner(&format!("Fetching catalog for {org}"));
    let names = client.list_repositories(&org);
    spinner.finish_and_clear();

    for name in names.with_context(|| format!("Failed to list catalog for '{org}'"))? {
        println!("{name}");
    }
    Ok(())
}
