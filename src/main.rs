//! CLI entry point for dependamerge

mod cli;

use clap::{Parser, Subcommand};
use cli::check::{run_check, CheckCliOptions};
use cli::run::{run_run, RunCliOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dependamerge",
    version,
    about = "Auto-approve and merge dependency-update bot PRs within policy"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate and merge approved bot PRs across configured repositories
    Run {
        /// Evaluate and report without approving or merging
        #[arg(long)]
        dry_run: bool,

        /// Preview with a dry run and prompt before merging
        #[arg(long)]
        confirm: bool,

        /// Path to the settings file (default: ~/.config/dependamerge/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Evaluate one PR and print the verdict; never merges
    Check {
        /// Repository slug (owner/name)
        repo: String,

        /// PR number
        number: u64,

        /// Path to the settings file (default: ~/.config/dependamerge/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run {
            dry_run,
            confirm,
            config,
        } => {
            run_run(RunCliOptions {
                dry_run,
                confirm,
                config,
            })
            .await?;
        }
        Command::Check {
            repo,
            number,
            config,
        } => {
            run_check(CheckCliOptions {
                repo,
                number,
                config,
            })
            .await?;
        }
    }

    Ok(())
}
