//! Business logic
//!
//! Lifecycle controllers and the catalog resolver. Modules here take every
//! external location (project directory, platform paths, organization URL)
//! as an explicit argument; nothing in `core` reads ambient global state.

pub mod global_config;
pub mod package;
pub mod platform;
pub mod project;
pub mod resolver;
