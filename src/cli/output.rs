//! Output formatting and progress indicators
//!
//! Utilities for displaying spinners, status-prefixed messages, and the
//! final error report to the user.

use std::sync::atomic::{AtomicBool, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

static QUIET: AtomicBool = AtomicBool::new(false);

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Info prefix
    pub const INFO: &str = "ℹ";
}

/// Global output configuration derived from CLI flags
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    quiet: bool,
}

impl OutputConfig {
    /// Build the configuration from CLI flags
    #[must_use]
    pub fn new(quiet: bool, _verbose: u8) -> Self {
        Self { quiet }
    }

    /// Apply the configuration process-wide
    pub fn apply_global(&self) {
        QUIET.store(self.quiet, Ordering::Relaxed);
    }
}

fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Create a spinner for operations with unknown duration
///
/// Returns a hidden bar in quiet mode so call sites stay unconditional.
pub fn create_spinner(message: &str) -> ProgressBar {
    if is_quiet() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Print a success line
pub fn print_success(message: &str) {
    if !is_quiet() {
        println!("{} {message}", status::SUCCESS);
    }
}

/// Print an indented detail line
pub fn print_detail(message: &str) {
    if !is_quiet() {
        println!("    {message}");
    }
}

/// Print an informational line
pub fn print_info(message: &str) {
    if !is_quiet() {
        println!("{} {message}", status::INFO);
    }
}

/// Report a failed command on stderr, including the cause chain
///
/// Errors are never quiet: scripts rely on the message to distinguish
/// failure kinds.
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("    caused by: {cause}");
    }
}
