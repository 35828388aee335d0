//! Entry point for the emberkit command-line application.

use anyhow::Result;
use clap::Parser;

use emberkit::cli::output::{display_error, OutputConfig};
use emberkit::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber; -v raises the default level
    let default_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.into()),
        )
        .init();

    // Apply output configuration globally
    let output_config = OutputConfig::new(cli.quiet, cli.verbose);
    output_config.apply_global();

    // Run the command and handle errors
    match cli.run() {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
