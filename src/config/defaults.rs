//! Filesystem layout constants

/// Project manifest file name, also the marker used for project-root upsearch
pub const MANIFEST_FILE: &str = "emberkit.toml";

/// Per-project directory holding full package checkouts
pub const PACKAGES_DIR: &str = "packages";

/// Per-project directory holding the linkage the build step includes
pub const LIBRARY_DIR: &str = "library";

/// Platform record file name inside the config directory
pub const PLATFORM_RECORD_FILE: &str = "platform.toml";

/// Global config file name inside the config directory
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Default directory name of the shared platform checkout inside the data dir
pub const PLATFORM_CHECKOUT_DIR: &str = "platform";
