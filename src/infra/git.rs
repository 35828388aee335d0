//! Git operations
//!
//! Wraps one git-tracked directory behind clone/status/update primitives.
//! History operations are delegated to the `git` binary; this module never
//! mutates a checkout through its own file I/O, and it never performs a
//! destructive reset on the user's behalf.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    /// The git binary is not installed or not on PATH
    #[error("git executable not found on PATH; install git and retry")]
    GitMissing,

    /// Source repository cannot be reached or does not exist
    #[error("Source unavailable: failed to reach '{url}': {detail}")]
    SourceUnavailable { url: String, detail: String },

    /// Clone destination already holds content
    #[error("Destination occupied: '{path}' already exists and is not empty")]
    DestinationOccupied { path: PathBuf },

    /// Path is not a git checkout
    #[error("'{path}' is not a git checkout")]
    NotARepository { path: PathBuf },

    /// Requested tag or branch does not exist in the clone
    #[error("Ref '{reference}' not found in '{path}'")]
    RefNotFound { path: PathBuf, reference: String },

    /// Update would discard or rewrite local work
    #[error("Unsafe update for '{path}': {reason}")]
    UnsafeUpdate { path: PathBuf, reason: String },

    /// A git subcommand failed for a reason outside the taxonomy above
    #[error("git {command} failed in '{path}': {stderr}")]
    CommandFailed {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// IO error
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

/// Working-copy status of a checkout relative to its index and upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoStatus {
    /// Nothing to lose: tree matches HEAD, no local-only commits
    Clean,
    /// Tracked files modified or changes staged for commit
    DirtyUncommitted,
    /// Untracked files present, nothing staged
    DirtyUntracked,
    /// Local commits that upstream does not have
    AheadOfUpstream,
    /// Local and upstream histories have both moved
    DivergedFromUpstream,
}

/// Handle to one git-tracked directory
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
}

/// Locate the git binary, surfacing a dedicated error when absent
fn git_binary() -> Result<PathBuf, GitError> {
    which::which("git").map_err(|_| GitError::GitMissing)
}

impl GitRepo {
    /// Whether `path` holds a git checkout
    #[must_use]
    pub fn is_checkout(path: &Path) -> bool {
        path.join(".git").exists()
    }

    /// Open an existing checkout
    pub fn open(path: &Path) -> Result<Self, GitError> {
        if !Self::is_checkout(path) {
            return Err(GitError::NotARepository {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Clone `url` into `dest`
    ///
    /// Fails with [`GitError::DestinationOccupied`] before any network
    /// traffic when `dest` already holds content, and with
    /// [`GitError::SourceUnavailable`] when the source cannot be reached.
    /// On success the destination is a clean checkout tracking the
    /// source's default branch.
    pub fn clone(url: &str, dest: &Path) -> Result<Self, GitError> {
        if dest.exists() {
            let occupied = std::fs::read_dir(dest)
                .map_err(|e| GitError::Io {
                    path: dest.to_path_buf(),
                    error: e.to_string(),
                })?
                .next()
                .is_some();
            if occupied {
                return Err(GitError::DestinationOccupied {
                    path: dest.to_path_buf(),
                });
            }
        } else if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GitError::Io {
                path: parent.to_path_buf(),
                error: e.to_string(),
            })?;
        }

        tracing::debug!(url, dest = %dest.display(), "cloning repository");
        let output = Command::new(git_binary()?)
            .arg("clone")
            .arg(url)
            .arg(dest)
            .output()
            .map_err(|e| GitError::Io {
                path: dest.to_path_buf(),
                error: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(GitError::SourceUnavailable {
                url: url.to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(Self {
            path: dest.to_path_buf(),
        })
    }

    /// Path of the checkout
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check out a tag or branch
    ///
    /// Fails with [`GitError::RefNotFound`] only when the reference does
    /// not exist; any other checkout failure (for example local changes
    /// that would be overwritten) keeps its captured stderr.
    pub fn checkout(&self, reference: &str) -> Result<(), GitError> {
        let peeled = format!("{reference}^{{commit}}");
        if self.run(&["rev-parse", "--verify", "--quiet", &peeled]).is_err() {
            return Err(GitError::RefNotFound {
                path: self.path.clone(),
                reference: reference.to_string(),
            });
        }
        self.run(&["checkout", reference])?;
        Ok(())
    }

    /// Compute the working-copy status without mutating anything
    ///
    /// Dirtiness takes precedence over ahead/diverged, and uncommitted
    /// changes over untracked files. Ahead/diverged are computed against
    /// the already-fetched remote-tracking refs; call [`Self::fetch`]
    /// first when freshness matters.
    pub fn status(&self) -> Result<RepoStatus, GitError> {
        let porcelain = self.run(&["status", "--porcelain"])?;
        let mut untracked = false;
        let mut uncommitted = false;
        for line in porcelain.lines() {
            if line.starts_with("??") {
                untracked = true;
            } else if !line.trim().is_empty() {
                uncommitted = true;
            }
        }
        if uncommitted {
            return Ok(RepoStatus::DirtyUncommitted);
        }
        if untracked {
            return Ok(RepoStatus::DirtyUntracked);
        }

        // No upstream (detached HEAD, local-only branch) means there is
        // nothing to compare against.
        let Ok(counts) = self.run(&["rev-list", "--left-right", "--count", "HEAD...@{upstream}"])
        else {
            return Ok(RepoStatus::Clean);
        };
        let mut fields = counts.split_whitespace();
        let ahead: u64 = fields.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        let behind: u64 = fields.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        Ok(match (ahead, behind) {
            (1.., 1..) => RepoStatus::DivergedFromUpstream,
            (1.., 0) => RepoStatus::AheadOfUpstream,
            _ => RepoStatus::Clean,
        })
    }

    /// Currently checked-out branch, or `None` for a detached HEAD
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        let name = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        if name == "HEAD" {
            Ok(None)
        } else {
            Ok(Some(name))
        }
    }

    /// Default branch of the origin remote, if origin/HEAD is known
    pub fn default_branch(&self) -> Result<Option<String>, GitError> {
        let Ok(full) = self.run(&["symbolic-ref", "refs/remotes/origin/HEAD"]) else {
            return Ok(None);
        };
        Ok(full
            .strip_prefix("refs/remotes/origin/")
            .map(std::string::ToString::to_string))
    }

    /// Commit id of HEAD
    pub fn head_commit(&self) -> Result<String, GitError> {
        self.run(&["rev-parse", "HEAD"])
    }

    /// Update remote-tracking refs; never touches the working tree
    pub fn fetch(&self) -> Result<(), GitError> {
        self.run(&["fetch", "--prune", "origin"]).map_err(|e| {
            let detail = match e {
                GitError::CommandFailed { stderr, .. } => stderr,
                other => other.to_string(),
            };
            GitError::SourceUnavailable {
                url: "origin".to_string(),
                detail,
            }
        })?;
        Ok(())
    }

    /// Advance the checkout to the upstream default branch, fast-forward only
    ///
    /// Returns whether HEAD moved. Fails with [`GitError::UnsafeUpdate`]
    /// when the merge would not be a fast-forward; local work is never
    /// discarded implicitly.
    pub fn fast_forward(&self) -> Result<bool, GitError> {
        let upstream = match self.default_branch()? {
            Some(branch) => format!("origin/{branch}"),
            None => "@{upstream}".to_string(),
        };

        let before = self.head_commit()?;
        self.run(&["merge", "--ff-only", &upstream]).map_err(|e| {
            let reason = match e {
                GitError::CommandFailed { stderr, .. } => stderr,
                other => other.to_string(),
            };
            GitError::UnsafeUpdate {
                path: self.path.clone(),
                reason: format!("cannot fast-forward to {upstream}: {reason}"),
            }
        })?;
        let after = self.head_commit()?;
        Ok(before != after)
    }

    /// Run a git subcommand inside the checkout, returning trimmed stdout
    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = Command::new(git_binary()?)
            .args(args)
            .current_dir(&self.path)
            .output()
            .map_err(|e| GitError::Io {
                path: self.path.clone(),
                error: e.to_string(),
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(GitError::CommandFailed {
                command: args.join(" "),
                path: self.path.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Run git in a fixture directory, panicking on failure
    fn git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .arg("-c")
            .arg("user.name=test")
            .arg("-c")
            .arg("user.email=test@example.com")
            .args(args)
            .current_dir(dir)
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// Create a source repository with one committed file
    fn make_origin(root: &Path) -> PathBuf {
        let origin = root.join("origin");
        std::fs::create_dir_all(&origin).unwrap();
        git(&origin, &["init"]);
        std::fs::write(origin.join("README.md"), "fixture\n").unwrap();
        git(&origin, &["add", "."]);
        git(&origin, &["commit", "-m", "initial"]);
        origin
    }

    fn commit_change(origin: &Path, name: &str) {
        std::fs::write(origin.join(name), "change\n").unwrap();
        git(origin, &["add", "."]);
        git(origin, &["commit", "-m", name]);
    }

    #[test]
    fn test_clone_from_local_source() {
        let temp = TempDir::new().unwrap();
        let origin = make_origin(temp.path());
        let dest = temp.path().join("clone");

        let repo = GitRepo::clone(origin.to_str().unwrap(), &dest).unwrap();

        assert!(GitRepo::is_checkout(&dest));
        assert_eq!(repo.status().unwrap(), RepoStatus::Clean);
        assert!(repo.current_branch().unwrap().is_some());
    }

    #[test]
    fn test_clone_into_occupied_destination_fails() {
        let temp = TempDir::new().unwrap();
        let origin = make_origin(temp.path());
        let dest = temp.path().join("occupied");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("leftover"), "x").unwrap();

        let result = GitRepo::clone(origin.to_str().unwrap(), &dest);

        match result.unwrap_err() {
            GitError::DestinationOccupied { path } => assert_eq!(path, dest),
            e => panic!("expected DestinationOccupied, got: {e:?}"),
        }
        // Pre-existing content untouched
        assert!(dest.join("leftover").exists());
    }

    #[test]
    fn test_clone_unreachable_source_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("no-such-repo");
        let dest = temp.path().join("clone");

        let result = GitRepo::clone(missing.to_str().unwrap(), &dest);

        assert!(matches!(
            result.unwrap_err(),
            GitError::SourceUnavailable { .. }
        ));
    }

    #[test]
    fn test_open_non_repository_fails() {
        let temp = TempDir::new().unwrap();
        let result = GitRepo::open(temp.path());
        assert!(matches!(result.unwrap_err(), GitError::NotARepository { .. }));
    }

    #[test]
    fn test_status_reports_untracked_then_uncommitted() {
        let temp = TempDir::new().unwrap();
        let origin = make_origin(temp.path());
        let dest = temp.path().join("clone");
        let repo = GitRepo::clone(origin.to_str().unwrap(), &dest).unwrap();

        std::fs::write(dest.join("scratch.txt"), "wip\n").unwrap();
        assert_eq!(repo.status().unwrap(), RepoStatus::DirtyUntracked);

        // Staging the addition makes it uncommitted work
        git(&dest, &["add", "scratch.txt"]);
        assert_eq!(repo.status().unwrap(), RepoStatus::DirtyUncommitted);

        // Modifying a tracked file also counts as uncommitted
        git(&dest, &["reset"]);
        std::fs::remove_file(dest.join("scratch.txt")).unwrap();
        std::fs::write(dest.join("README.md"), "edited\n").unwrap();
        assert_eq!(repo.status().unwrap(), RepoStatus::DirtyUncommitted);
    }

    #[test]
    fn test_status_ahead_and_diverged() {
        let temp = TempDir::new().unwrap();
        let origin = make_origin(temp.path());
        let dest = temp.path().join("clone");
        let repo = GitRepo::clone(origin.to_str().unwrap(), &dest).unwrap();

        std::fs::write(dest.join("local.txt"), "local\n").unwrap();
        git(&dest, &["add", "."]);
        git(&dest, &["commit", "-m", "local work"]);
        assert_eq!(repo.status().unwrap(), RepoStatus::AheadOfUpstream);

        commit_change(&origin, "remote.txt");
        repo.fetch().unwrap();
        assert_eq!(repo.status().unwrap(), RepoStatus::DivergedFromUpstream);
    }

    #[test]
    fn test_fast_forward_advances_behind_checkout() {
        let temp = TempDir::new().unwrap();
        let origin = make_origin(temp.path());
        let dest = temp.path().join("clone");
        let repo = GitRepo::clone(origin.to_str().unwrap(), &dest).unwrap();

        commit_change(&origin, "update.txt");
        repo.fetch().unwrap();
        assert!(repo.fast_forward().unwrap());
        assert!(dest.join("update.txt").exists());

        // At the fixed point the merge is a no-op
        repo.fetch().unwrap();
        assert!(!repo.fast_forward().unwrap());
    }

    #[test]
    fn test_fast_forward_refuses_diverged_history() {
        let temp = TempDir::new().unwrap();
        let origin = make_origin(temp.path());
        let dest = temp.path().join("clone");
        let repo = GitRepo::clone(origin.to_str().unwrap(), &dest).unwrap();

        std::fs::write(dest.join("local.txt"), "local\n").unwrap();
        git(&dest, &["add", "."]);
        git(&dest, &["commit", "-m", "local work"]);
        commit_change(&origin, "remote.txt");
        repo.fetch().unwrap();

        let before = repo.head_commit().unwrap();
        let result = repo.fast_forward();
        assert!(matches!(result.unwrap_err(), GitError::UnsafeUpdate { .. }));
        // Local commit is intact
        assert_eq!(repo.head_commit().unwrap(), before);
    }

    #[test]
    fn test_checkout_tag_and_missing_ref() {
        let temp = TempDir::new().unwrap();
        let origin = make_origin(temp.path());
        git(&origin, &["tag", "v1.0"]);
        commit_change(&origin, "later.txt");

        let dest = temp.path().join("clone");
        let repo = GitRepo::clone(origin.to_str().unwrap(), &dest).unwrap();

        repo.checkout("v1.0").unwrap();
        assert!(!dest.join("later.txt").exists());

        match repo.checkout("no-such-ref").unwrap_err() {
            GitError::RefNotFound { reference, .. } => assert_eq!(reference, "no-such-ref"),
            e => panic!("expected RefNotFound, got: {e:?}"),
        }
    }

    #[test]
    fn test_checkout_blocked_by_local_changes_is_not_ref_not_found() {
        let temp = TempDir::new().unwrap();
        let origin = make_origin(temp.path());
        git(&origin, &["tag", "v1"]);
        commit_change(&origin, "README.md");

        let dest = temp.path().join("clone");
        let repo = GitRepo::clone(origin.to_str().unwrap(), &dest).unwrap();

        // Local edit of a file that differs between HEAD and the tag
        std::fs::write(dest.join("README.md"), "local edit\n").unwrap();

        match repo.checkout("v1").unwrap_err() {
            GitError::CommandFailed { stderr, .. } => {
                assert!(!stderr.is_empty(), "stderr should explain the refusal");
            }
            e => panic!("expected CommandFailed, got: {e:?}"),
        }
        // The edit survives the refused checkout
        assert_eq!(
            std::fs::read_to_string(dest.join("README.md")).unwrap(),
            "local edit\n"
        );
    }

    #[test]
    fn test_default_branch_matches_origin_head() {
        let temp = TempDir::new().unwrap();
        let origin = make_origin(temp.path());
        let dest = temp.path().join("clone");
        let repo = GitRepo::clone(origin.to_str().unwrap(), &dest).unwrap();

        let default = repo.default_branch().unwrap();
        assert_eq!(default, repo.current_branch().unwrap());

        git(&dest, &["checkout", "-b", "feature"]);
        assert_eq!(repo.current_branch().unwrap(), Some("feature".to_string()));
        assert_ne!(repo.current_branch().unwrap(), default);
    }
}
