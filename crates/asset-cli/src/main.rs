//! Asset pipeline CLI
//!
//! Installs content units as symlinks, keeps reference documentation in sync,
//! and validates markdown against a remote renderer.

mod cli;
mod commands;
mod error;

use std::io;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Exit code 2 is reserved for a missing credential
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    init_tracing(cli.verbose);

    if let Err(e) = execute_command(cli.command) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

/// Logs go to stderr so stdout stays usable for rendered output and JSON.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(verbose)
        .try_init();
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Install(args) => commands::run_install(&args),
        Commands::Sync(args) => commands::run_sync(&args),
        Commands::Validate(args) => commands::run_validate(&args),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "asset", &mut io::stdout());
            Ok(())
        }
    }
}
