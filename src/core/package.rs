//! Package lifecycle
//!
//! Installs and removes a single package in one project: resolve the
//! source, clone it under `packages/<name>`, check out a requested ref,
//! and link it into `library/<name>`. No persisted intermediate state
//! exists; an interrupted install is detected on the next attempt and
//! either resumed (a valid checkout is already present) or refused (the
//! directory holds something else).

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::defaults::PACKAGES_DIR;
use crate::core::project::find_project_root;
use crate::core::resolver::{self, ResolveError};
use crate::infra::git::{GitError, GitRepo};
use crate::infra::link::{self, LinkError};

/// Errors that can occur during package installation
#[derive(Error, Debug)]
pub enum InstallError {
    /// No enclosing project
    #[error("No emberkit project found at or above '{path}'")]
    ProjectNotFound { path: PathBuf },

    /// Resolution error
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Git error
    #[error(transparent)]
    Git(#[from] GitError),

    /// Linkage error
    #[error(transparent)]
    Link(#[from] LinkError),

    /// IO error
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

/// Errors that can occur during package removal
#[derive(Error, Debug)]
pub enum RemoveError {
    /// No enclosing project
    #[error("No emberkit project found at or above '{path}'")]
    ProjectNotFound { path: PathBuf },

    /// Linkage error, including not-installed
    #[error(transparent)]
    Link(#[from] LinkError),
}

/// An install request
#[derive(Debug, Clone)]
pub struct InstallRequest<'a> {
    /// Catalog name or raw source location
    pub spec: &'a str,
    /// Tag or branch to check out after the clone
    pub tag: Option<&'a str>,
    /// Organization URL catalog names resolve into
    pub org_url: &'a str,
}

/// Result of installing a package
#[derive(Debug)]
pub struct InstallResult {
    /// Package name
    pub name: String,
    /// Source location that was cloned
    pub url: String,
    /// Checkout under `packages/`
    pub package_path: PathBuf,
    /// Linkage under `library/`
    pub library_path: PathBuf,
    /// Whether an existing checkout was reused instead of cloned
    pub resumed: bool,
}

/// Install a package into the project enclosing `start_dir`
pub fn install(start_dir: &Path, request: &InstallRequest<'_>) -> Result<InstallResult, InstallError> {
    let project = find_project_root(start_dir).ok_or_else(|| InstallError::ProjectNotFound {
        path: start_dir.to_path_buf(),
    })?;

    let source = resolver::resolve(request.spec, request.org_url)?;
    let packages_dir = project.join(PACKAGES_DIR);
    std::fs::create_dir_all(&packages_dir).map_err(|e| InstallError::Io {
        path: packages_dir.clone(),
        error: e.to_string(),
    })?;
    let package_path = packages_dir.join(&source.name);

    let (repo, resumed) = if package_path.exists() {
        // Leftover from an interrupted install: reuse a valid checkout,
        // refuse anything else so nothing is silently duplicated.
        let repo = GitRepo::open(&package_path).map_err(|_| GitError::DestinationOccupied {
            path: package_path.clone(),
        })?;
        tracing::info!(name = source.name, "existing checkout found, skipping clone");
        (repo, true)
    } else {
        (GitRepo::clone(&source.url, &package_path)?, false)
    };

    // Restore prior state on failure: a clone made by this invocation is
    // removed so the failed install leaves no residue.
    let cleanup = |e: InstallError| {
        if !resumed {
            let _ = std::fs::remove_dir_all(&package_path);
        }
        e
    };

    if let Some(tag) = request.tag {
        if let Err(e) = repo.checkout(tag) {
            return Err(cleanup(e.into()));
        }
    }

    let library_path = match link::link(&project, &source.name) {
        Ok(path) => path,
        Err(e) => return Err(cleanup(e.into())),
    };

    tracing::info!(name = source.name, url = source.url, "package installed");
    Ok(InstallResult {
        name: source.name,
        url: source.url,
        package_path,
        library_path,
        resumed,
    })
}

/// Remove a package from the project enclosing `start_dir`
pub fn remove(start_dir: &Path, name: &str) -> Result<(), RemoveError> {
    let project = find_project_root(start_dir).ok_or_else(|| RemoveError::ProjectNotFound {
        path: start_dir.to_path_buf(),
    })?;

    link::unlink(&project, name)?;
    tracing::info!(name, "package removed");
    Ok(())
}

/// Names of packages installed in the project enclosing `start_dir`
pub fn list_installed(start_dir: &Path) -> Result<Vec<String>, RemoveError> {
    let project = find_project_root(start_dir).ok_or_else(|| RemoveError::ProjectNotFound {
        path: start_dir.to_path_buf(),
    })?;

    let packages_dir = project.join(PACKAGES_DIR);
    let mut names = Vec::new();
    if let Ok(entries) = std::fs::read_dir(&packages_dir) {
        for entry in entries.flatten() {
            if entry.path().is_dir() {
                if let Ok(name) = entry.file_name().into_string() {
                    names.push(name);
                }
            }
        }
    }
    names.sort();
    Ok(names)
}
