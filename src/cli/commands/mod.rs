//! CLI command implementations
//!
//! Each command group is implemented in its own submodule.

pub mod package;
pub mod platform;
pub mod project;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start and configure firmware projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Manage the shared platform checkout
    Platform {
        #[command(subcommand)]
        command: PlatformCommands,
    },

    /// Manage library packages in a project
    Package {
        #[command(subcommand)]
        command: PackageCommands,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Start a new firmware project
    Start {
        /// Project name (also the directory that will be created)
        name: String,
    },
}

/// Platform subcommands
#[derive(Subcommand, Debug)]
pub enum PlatformCommands {
    /// Install the shared platform checkout
    Install,

    /// Update the shared platform checkout to its upstream head
    Update,
}

/// Package subcommands
#[derive(Subcommand, Debug)]
pub enum PackageCommands {
    /// Download a package and link it into the project
    Install {
        /// Catalog name or repository URL
        package: String,

        /// Tag or branch to check out after the clone
        #[arg(short, long)]
        tag: Option<String>,

        /// Project directory to operate in (defaults to the current directory)
        #[arg(short = 'd', long)]
        project_directory: Option<PathBuf>,
    },

    /// Remove a package from the project
    Remove {
        /// Package name to remove
        package: String,

        /// Project directory to operate in (defaults to the current directory)
        #[arg(short = 'd', long)]
        project_directory: Option<PathBuf>,
    },

    /// List catalog packages, or installed ones with --installed
    List {
        /// List packages installed in the project instead of the catalog
        #[arg(long)]
        installed: bool,

        /// Project directory to operate in (defaults to the current directory)
        #[arg(short = 'd', long)]
        project_directory: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the command
    pub fn run(self) -> Result<()> {
        match self {
            Self::Project { command } => match command {
                ProjectCommands::Start { name } => {
                    let current_dir = std::env::current_dir()?;
                    project::execute_start(&current_dir, &name)
                }
            },
            Self::Platform { command } => match command {
                PlatformCommands::Install => platform::execute_install(),
                PlatformCommands::Update => platform::execute_update(),
            },
            Self::Package { command } => match command {
                PackageCommands::Install {
                    package: pkg,
                    tag,
                    project_directory,
                } => {
                    let dir = resolve_dir(project_directory)?;
                    package::execute_install(&dir, &pkg, tag.as_deref())
                }
                PackageCommands::Remove {
                    package: pkg,
                    project_directory,
                } => {
                    let dir = resolve_dir(project_directory)?;
                    package::execute_remove(&dir, &pkg)
                }
                PackageCommands::List {
                    installed,
                    project_directory,
                } => {
                    let dir = resolve_dir(project_directory)?;
                    package::execute_list(&dir, installed)
                }
            },
        }
    }
}

fn resolve_dir(project_directory: Option<PathBuf>) -> Result<PathBuf> {
    match project_directory {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}
