//! Emberkit - firmware project and platform lifecycle manager
//!
//! Emberkit scaffolds firmware projects, installs library packages into
//! them, and manages the shared platform checkout that every project
//! builds against.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic (lifecycle controllers, resolver, scaffolding)
//! - [`registry`] - Catalog listing client
//! - [`infra`] - Infrastructure layer (git, symlinks, directories)
//! - [`config`] - Configuration and constants
pub mod cli;
pub mod config;
pub mod core;
pub mod infra;
pub mod registry;
