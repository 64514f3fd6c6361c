//! IDL resolver CLI
//!
//! Reads syntax trees produced by an IDL parser (as JSON) and prints the
//! resolved IR, or checks that a set of trees resolves cleanly.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "CLI tool needs to print to stdout/stderr"
)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod check;
mod input;
mod resolve;

#[derive(Parser)]
#[command(name = "idlc")]
#[command(about = "IDL semantic resolver", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one syntax tree and print its IR as JSON
    Resolve {
        /// Syntax tree (JSON array of definitions)
        tree: PathBuf,

        /// Resolver configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Scope the tree is declared in, e.g. `pkg::msgs`
        #[arg(long)]
        entry_scope: Option<String>,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Resolve every tree and report all errors
    Check {
        /// Syntax trees (JSON arrays of definitions)
        #[arg(required = true)]
        trees: Vec<PathBuf>,

        /// Resolver configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            tree,
            config,
            entry_scope,
            compact,
        } => {
            let config = input::config(config.as_deref(), entry_scope.as_deref())?;
            resolve::resolve(&tree, &config, compact)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { trees, config } => {
            let config = input::config(config.as_deref(), None)?;
            let clean = check::check(&trees, &config)?;
            Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (warnings only by default)
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}
