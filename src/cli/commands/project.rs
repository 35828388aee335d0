//! CLI implementation for `emberkit project` commands

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{print_detail, print_success};
use crate::core::project;

/// Execute the project start command
pub fn execute_start(current_dir: &Path, name: &str) -> Result<()> {
    let result = project::start(current_dir, name)
        .with_context(|| format!("Failed to start project '{name}'"))?;

    print_success(&format!("Created project: {name}"));
    print_detail(&format!("manifest: {}", result.manifest_path.display()));
    print_detail("directories: packages/, library/");
    print_detail("starter source: main.cpp");
    print_detail("next: 'emberkit package install <name>' to add libraries");

    Ok(())
}
