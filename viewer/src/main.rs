//! Globe viewer binary
//!
//! Opens the viewer by default; `globe mesh` generates a sphere without a window.

use anyhow::Result;
use clap::Parser;
use globe_viewer::cli::{self, Cli, Command};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().into_command() {
        Command::View(args) => cli::execute_view(args),
        Command::Mesh(args) => cli::execute_mesh(&args, std::io::stdout().lock()),
    }
}
