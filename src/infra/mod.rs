//! Infrastructure layer
//!
//! Wraps everything that touches the outside world: the git binary,
//! the filesystem linkage between checkouts and projects, and the
//! platform-specific directory layout.

pub mod dirs;
pub mod git;
pub mod link;
