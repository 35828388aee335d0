//! Package linkage
//!
//! Maintains the relation between a package checkout under
//! `packages/<name>` and its entry under `library/<name>`, which is what
//! the build collaborator includes. The two directories must agree
//! name-for-name: install and remove go through this module so neither
//! side can exist without the other.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::defaults::{LIBRARY_DIR, PACKAGES_DIR};

/// Linkage errors
#[derive(Error, Debug)]
pub enum LinkError {
    /// A different checkout already occupies `library/<name>`
    #[error("Name conflict: 'library/{name}' already refers to a different checkout")]
    NameConflict { name: String },

    /// Neither the linkage nor the checkout exists
    #[error("Package '{name}' is not installed")]
    NotInstalled { name: String },

    /// IO error
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> LinkError + '_ {
    move |e| LinkError::Io {
        path: path.to_path_buf(),
        error: e.to_string(),
    }
}

/// Resolve the directory a `library/<name>` entry should point at
///
/// Library repositories keep their sources in an inner directory named
/// after the repository; when that layout is present the linkage targets
/// the inner directory so includes resolve without path duplication.
#[must_use]
pub fn link_target(project: &Path, name: &str) -> PathBuf {
    let package_dir = project.join(PACKAGES_DIR).join(name);
    let nested = package_dir.join(name);
    if nested.is_dir() {
        nested
    } else {
        package_dir
    }
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

/// Create the `library/<name>` linkage for an installed checkout
///
/// Idempotent: linking the same name to the same checkout twice leaves
/// the same end state. Fails with [`LinkError::NameConflict`] when the
/// entry exists but refers elsewhere, or is not a linkage at all.
pub fn link(project: &Path, name: &str) -> Result<PathBuf, LinkError> {
    let library_dir = project.join(LIBRARY_DIR);
    std::fs::create_dir_all(&library_dir).map_err(io_err(&library_dir))?;

    let target = link_target(project, name);
    let entry = library_dir.join(name);

    if let Ok(metadata) = std::fs::symlink_metadata(&entry) {
        if !metadata.file_type().is_symlink() {
            return Err(LinkError::NameConflict {
                name: name.to_string(),
            });
        }
        let existing = std::fs::read_link(&entry).map_err(io_err(&entry))?;
        if existing == target {
            return Ok(entry);
        }
        return Err(LinkError::NameConflict {
            name: name.to_string(),
        });
    }

    tracing::debug!(name, target = %target.display(), "linking package");
    symlink_dir(&target, &entry).map_err(io_err(&entry))?;
    Ok(entry)
}

/// Remove both the `library/<name>` linkage and the `packages/<name>` checkout
///
/// Detection is tolerant: partial state (only one side present) still
/// counts as installed. Cleanup is strict: afterwards neither side
/// remains, which makes a failed or interrupted remove safe to retry.
pub fn unlink(project: &Path, name: &str) -> Result<(), LinkError> {
    let entry = project.join(LIBRARY_DIR).join(name);
    let package_dir = project.join(PACKAGES_DIR).join(name);

    let entry_meta = std::fs::symlink_metadata(&entry).ok();
    let package_exists = package_dir.exists();

    if entry_meta.is_none() && !package_exists {
        return Err(LinkError::NotInstalled {
            name: name.to_string(),
        });
    }

    if let Some(metadata) = entry_meta {
        if metadata.file_type().is_dir() {
            std::fs::remove_dir_all(&entry).map_err(io_err(&entry))?;
        } else {
            std::fs::remove_file(&entry).map_err(io_err(&entry))?;
        }
    }

    if package_exists {
        std::fs::remove_dir_all(&package_dir).map_err(io_err(&package_dir))?;
    }

    tracing::debug!(name, "package unlinked");
    Ok(())
}

/// Whether `library/<name>` exists and refers to the package checkout
#[must_use]
pub fn is_linked(project: &Path, name: &str) -> bool {
    let entry = project.join(LIBRARY_DIR).join(name);
    match std::fs::read_link(&entry) {
        Ok(existing) => existing == link_target(project, name),
        Err(_) => false,
    }
}
