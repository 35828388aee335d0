//! Project scaffolding and discovery
//!
//! Creates new firmware project skeletons and locates the enclosing
//! project root for commands that run from anywhere inside a project.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::defaults::{LIBRARY_DIR, MANIFEST_FILE, PACKAGES_DIR};

/// Scaffolding errors
#[derive(Error, Debug)]
pub enum StartError {
    /// Target directory already exists
    #[error("'{path}' already exists; refusing to overwrite it")]
    AlreadyExists { path: PathBuf },

    /// IO error during scaffolding
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

/// Result of scaffolding a project
#[derive(Debug)]
pub struct StartResult {
    /// Root of the new project
    pub root: PathBuf,
    /// Path of the created manifest
    pub manifest_path: PathBuf,
}

/// Starter application source written into every new project
const STARTER_MAIN: &str = r#"#include <platform/system.hpp>

int main()
{
  while (true)
  {
    platform::log("hello from emberkit\n");
    platform::delay_ms(1000);
  }

  return 0;
}
"#;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StartError + '_ {
    move |e| StartError::Io {
        path: path.to_path_buf(),
        error: e.to_string(),
    }
}

/// Generate the default manifest content
#[must_use]
pub fn generate_manifest_content(project_name: &str) -> String {
    format!(
        r#"# Emberkit Project Configuration
# See https://github.com/emberkit-dev/emberkit for documentation

[project]
name = "{project_name}"
version = "0.1.0"
# description = "My firmware project"

# Installed packages live under packages/ with a matching entry under
# library/; use 'emberkit package install <name>' to manage them.
"#
    )
}

/// Walk upward from `start` until a directory holding the manifest is found
///
/// `start` may be a file or a directory; search begins at the containing
/// directory and ends at the filesystem root.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let base = if start.is_dir() {
        start
    } else {
        start.parent()?
    };
    let mut dir = base.canonicalize().ok()?;
    loop {
        if dir.join(MANIFEST_FILE).is_file() {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Create a new project skeleton at `parent/name`
///
/// Fails when the target directory already exists rather than
/// overwriting anything in it.
pub fn start(parent: &Path, name: &str) -> Result<StartResult, StartError> {
    let root = parent.join(name);
    if root.exists() {
        return Err(StartError::AlreadyExists { path: root });
    }

    std::fs::create_dir_all(&root).map_err(io_err(&root))?;
    for dir in [PACKAGES_DIR, LIBRARY_DIR] {
        let path = root.join(dir);
        std::fs::create_dir_all(&path).map_err(io_err(&path))?;
    }

    let manifest_path = root.join(MANIFEST_FILE);
    std::fs::write(&manifest_path, generate_manifest_content(name))
        .map_err(io_err(&manifest_path))?;

    let main_path = root.join("main.cpp");
    std::fs::write(&main_path, STARTER_MAIN).map_err(io_err(&main_path))?;

    tracing::info!(name, root = %root.display(), "project scaffolded");
    Ok(StartResult {
        root,
        manifest_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_start_creates_skeleton() {
        let temp = TempDir::new().unwrap();

        let result = start(temp.path(), "blinky").unwrap();

        assert!(result.root.join(MANIFEST_FILE).is_file());
        assert!(result.root.join(PACKAGES_DIR).is_dir());
        assert!(result.root.join(LIBRARY_DIR).is_dir());
        assert!(result.root.join("main.cpp").is_file());

        let manifest: toml::Value =
            toml::from_str(&std::fs::read_to_string(&result.manifest_path).unwrap()).unwrap();
        assert_eq!(
            manifest["project"]["name"].as_str(),
            Some("blinky")
        );
    }

    #[test]
    fn test_start_refuses_existing_directory() {
        let temp = TempDir::new().unwrap();
        start(temp.path(), "blinky").unwrap();

        let result = start(temp.path(), "blinky");
        match result.unwrap_err() {
            StartError::AlreadyExists { path } => {
                assert!(path.ends_with("blinky"));
            }
            e => panic!("expected AlreadyExists, got: {e:?}"),
        }
    }

    #[test]
    fn test_find_project_root_from_nested_directory() {
        let temp = TempDir::new().unwrap();
        let result = start(temp.path(), "blinky").unwrap();
        let nested = result.root.join("src").join("drivers");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_project_root(&nested).unwrap();
        assert_eq!(found, result.root.canonicalize().unwrap());
    }

    #[test]
    fn test_find_project_root_outside_project() {
        let temp = TempDir::new().unwrap();
        assert!(find_project_root(temp.path()).is_none());
    }
}
