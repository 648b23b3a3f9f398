// Copyright 2026 Reclaim Contributors
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code, unused_imports)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod cli;
mod clipboard;
mod config;
mod dom;
mod events;
mod interact;
mod patch;
mod reconcile;
mod rules;
mod site;

#[derive(Parser)]
#[command(
    name = "reclaim",
    about = "Reclaim — converge a mirrored template site to its owner's identity",
    version,
    after_help = "Run 'reclaim <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to a reclaim.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one full patch pass over a mirrored site
    Patch {
        /// Site root directory containing the mirrored HTML
        root: PathBuf,
    },
    /// Keep a mirrored site converged, re-patching as it is regenerated
    Watch {
        /// Site root directory containing the mirrored HTML
        root: PathBuf,
    },
    /// Report which files a pass would change, without writing
    Check {
        /// Site root directory containing the mirrored HTML
        root: PathBuf,
    },
    /// Copy the canonical email address to the clipboard
    CopyEmail,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Global flags travel via environment variables so all modules can
    // check them without threading state through.
    if cli.json {
        std::env::set_var("RECLAIM_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("RECLAIM_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("RECLAIM_VERBOSE", "1");
    }
    if cli.no_color {
        std::env::set_var("RECLAIM_NO_COLOR", "1");
    }

    let default_filter = if cli.verbose {
        "reclaim=debug"
    } else {
        "reclaim=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Patch { root } => cli::patch_cmd::run(&root, config).await,
        Commands::Watch { root } => cli::watch_cmd::run(&root, config).await,
        Commands::Check { root } => cli::check_cmd::run(&root, config).await,
        Commands::CopyEmail => cli::copy_cmd::run(config).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "reclaim", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() && !cli::output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
