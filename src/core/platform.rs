//! Platform lifecycle
//!
//! Installs and updates the shared platform checkout, and owns the
//! persisted record of where that checkout lives. The record is written
//! only by a successful install and never deleted implicitly. Update is
//! the safety-critical operation: the platform checkout is shared
//! infrastructure, so any local work in it refuses the update instead of
//! being rewritten.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::global_config::GlobalConfig;
use crate::infra::dirs::EmberkitDirs;
use crate::infra::git::{GitError, GitRepo, RepoStatus};

/// Platform lifecycle errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// No usable platform record
    #[error("Platform is not installed; run 'emberkit platform install' first")]
    NotInstalled,

    /// Update would touch local work
    #[error("Unsafe update for '{path}': {reason}; restore the checkout and retry - emberkit never discards local work")]
    UnsafeUpdate { path: PathBuf, reason: String },

    /// Git error
    #[error(transparent)]
    Git(#[from] GitError),

    /// Failed to read the platform record
    #[error("Failed to read platform record '{path}': {error}")]
    RecordRead { path: PathBuf, error: String },

    /// Failed to write the platform record
    #[error("Failed to write platform record '{path}': {error}")]
    RecordWrite { path: PathBuf, error: String },
}

/// Locations the platform controller operates on
///
/// Constructed by the caller and passed explicitly; the controller never
/// reads ambient global state.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Persisted record of the installed checkout's location
    pub record_path: PathBuf,
    /// Where a fresh install clones to
    pub checkout_dir: PathBuf,
    /// Platform source repository
    pub source_url: String,
}

impl PlatformPaths {
    /// Assemble the effective paths from directories and global config
    #[must_use]
    pub fn from_environment(dirs: &EmberkitDirs, config: &GlobalConfig) -> Self {
        Self {
            record_path: dirs.platform_record_path(),
            checkout_dir: config
                .platform
                .path
                .clone()
                .unwrap_or_else(|| dirs.platform_checkout_dir()),
            source_url: config.platform_url().to_string(),
        }
    }
}

/// Persisted record of the installed platform checkout
///
/// At most one exists per user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformRecord {
    /// Absolute path of the checkout
    pub path: PathBuf,
}

impl PlatformRecord {
    /// Load the record, `None` when it has never been written
    pub fn load(record_path: &Path) -> Result<Option<Self>, PlatformError> {
        if !record_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(record_path).map_err(|e| PlatformError::RecordRead {
            path: record_path.to_path_buf(),
            error: e.to_string(),
        })?;
        let record = toml::from_str(&content).map_err(|e| PlatformError::RecordRead {
            path: record_path.to_path_buf(),
            error: e.to_string(),
        })?;
        Ok(Some(record))
    }

    /// Persist the record, creating parent directories as needed
    pub fn save(&self, record_path: &Path) -> Result<(), PlatformError> {
        let write_err = |e: std::io::Error| PlatformError::RecordWrite {
            path: record_path.to_path_buf(),
            error: e.to_string(),
        };
        if let Some(parent) = record_path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| PlatformError::RecordWrite {
            path: record_path.to_path_buf(),
            error: e.to_string(),
        })?;
        fs::write(record_path, content).map_err(write_err)
    }

    /// Whether the recorded path still holds a checkout
    #[must_use]
    pub fn is_valid(&self) -> bool {
        GitRepo::is_checkout(&self.path)
    }
}

/// Outcome of a platform install
#[derive(Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Record already pointed at a valid checkout; nothing was done
    AlreadyInstalled { path: PathBuf },
    /// An existing checkout at the destination was recorded as-is
    Adopted { path: PathBuf },
    /// Fresh clone
    Installed { path: PathBuf },
}

/// Outcome of a platform update
#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Checkout advanced to the upstream head
    Updated { commit: String },
    /// Already at the upstream head; nothing changed
    AlreadyCurrent,
}

/// Install the shared platform
///
/// Idempotent: a record pointing at an existing checkout makes this a
/// no-op. A stale record (path gone or no longer a checkout) falls
/// through to a fresh install, and a valid checkout already sitting at
/// the destination is adopted instead of re-cloned.
pub fn install(paths: &PlatformPaths) -> Result<InstallOutcome, PlatformError> {
    if let Some(record) = PlatformRecord::load(&paths.record_path)? {
        if record.is_valid() {
            tracing::info!(path = %record.path.display(), "platform already installed");
            return Ok(InstallOutcome::AlreadyInstalled { path: record.path });
        }
        tracing::warn!(
            path = %record.path.display(),
            "platform record is stale, reinstalling"
        );
    }

    let outcome = if GitRepo::is_checkout(&paths.checkout_dir) {
        InstallOutcome::Adopted {
            path: paths.checkout_dir.clone(),
        }
    } else {
        GitRepo::clone(&paths.source_url, &paths.checkout_dir)?;
        InstallOutcome::Installed {
            path: paths.checkout_dir.clone(),
        }
    };

    // The record is written only after the checkout is known good.
    PlatformRecord {
        path: paths.checkout_dir.clone(),
    }
    .save(&paths.record_path)?;

    tracing::info!(path = %paths.checkout_dir.display(), "platform installed");
    Ok(outcome)
}

/// Update the shared platform to its upstream head
///
/// Refuses with [`PlatformError::UnsafeUpdate`] when the checkout is on a
/// non-default branch, detached, carries uncommitted changes, or has
/// diverged from upstream. Plain untracked files do not block the
/// fast-forward. Running twice with no upstream change succeeds and
/// changes nothing.
pub fn update(paths: &PlatformPaths) -> Result<UpdateOutcome, PlatformError> {
    let record = PlatformRecord::load(&paths.record_path)?.ok_or(PlatformError::NotInstalled)?;
    if !record.is_valid() {
        return Err(PlatformError::NotInstalled);
    }
    let repo = GitRepo::open(&record.path)?;

    let refuse = |reason: String| PlatformError::UnsafeUpdate {
        path: record.path.clone(),
        reason,
    };

    let default_branch = repo.default_branch()?;
    match repo.current_branch()? {
        None => {
            return Err(refuse(
                "HEAD is detached; check out the default branch".to_string(),
            ))
        }
        Some(current) => {
            if let Some(default) = &default_branch {
                if &current != default {
                    return Err(refuse(format!(
                        "checkout is on branch '{current}' instead of the default '{default}'; switch back before updating"
                    )));
                }
            }
        }
    }

    if repo.status()? == RepoStatus::DirtyUncommitted {
        return Err(refuse(
            "checkout has uncommitted changes; commit or stash them first".to_string(),
        ));
    }

    repo.fetch()?;

    if repo.status()? == RepoStatus::DivergedFromUpstream {
        return Err(refuse(
            "local commits have diverged from upstream; reconcile them manually".to_string(),
        ));
    }

    let moved = repo.fast_forward().map_err(|e| match e {
        GitError::UnsafeUpdate { path, reason } => PlatformError::UnsafeUpdate { path, reason },
        other => PlatformError::Git(other),
    })?;

    if moved {
        let commit = repo.head_commit()?;
        tracing::info!(commit, "platform updated");
        Ok(UpdateOutcome::Updated { commit })
    } else {
        tracing::info!("platform already current");
        Ok(UpdateOutcome::AlreadyCurrent)
    }
}
