//! Common test utilities and helpers
//!
//! Shared fixtures for integration tests: temporary project directories,
//! local git remotes, and a command builder that isolates every run from
//! the user's real config and data directories.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary directory for test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Isolated config/data environment for one emberkit invocation
pub struct TestEnv {
    /// Stand-in for the user config directory
    pub config_dir: TempDir,
    /// Stand-in for the user data directory
    pub data_dir: TempDir,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().expect("Failed to create config dir"),
            data_dir: TempDir::new().expect("Failed to create data dir"),
        }
    }

    /// Command for the emberkit binary, isolated from real user state
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_emberkit"));
        cmd.env("EMBERKIT_CONFIG_DIR", self.config_dir.path());
        cmd.env("EMBERKIT_DATA_DIR", self.data_dir.path());
        cmd
    }

    /// Point the platform source at a local fixture repository
    pub fn set_platform_url(&self, url: &Path) {
        let content = format!("[platform]\nurl = \"{}\"\n", url.display());
        std::fs::write(self.config_dir.path().join("config.toml"), content)
            .expect("Failed to write global config");
    }

    /// Default location the platform is cloned to
    pub fn platform_checkout(&self) -> PathBuf {
        self.data_dir.path().join("platform")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Run git in a fixture directory, panicking on failure
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) {
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

/// Trimmed stdout of a git query in a fixture directory
#[allow(dead_code)]
pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Create a source repository with one committed file and a `v1` tag
#[allow(dead_code)]
pub fn make_remote(root: &Path, name: &str) -> PathBuf {
    let remote = root.join(name);
    std::fs::create_dir_all(&remote).expect("Failed to create remote dir");
    git(&remote, &["init"]);
    std::fs::write(remote.join("lib.cpp"), "// fixture source\n").expect("Failed to write file");
    git(&remote, &["add", "."]);
    git(&remote, &["commit", "-m", "initial"]);
    git(&remote, &["tag", "v1"]);
    remote
}

/// Add a commit to a fixture remote
#[allow(dead_code)]
pub fn commit_change(remote: &Path, name: &str) {
    std::fs::write(remote.join(name), "change\n").expect("Failed to write file");
    git(remote, &["add", "."]);
    git(remote, &["commit", "-m", name]);
}

/// Combined stdout+stderr of a finished command, for message assertions
#[allow(dead_code)]
pub fn combined_output(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
