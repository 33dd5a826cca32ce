//! jwt-gate: JWT claim extraction and key resolution for API gateways.
//!
//! Entry point for the application. Initializes logging, parses CLI
//! arguments and delegates to the appropriate command handler.

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod display;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default: warnings only).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Parse CLI arguments and dispatch to the appropriate command handler.
///
/// Returns a `Result` so the caller can exit without `process::exit`,
/// allowing all destructors (including `Zeroizing`) to run.
fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Decode(args) => commands::decode::execute(args),
        Commands::Claims(args) => commands::claims::execute(args),
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Keyset(args) => commands::keyset::execute(args),
    }
}
