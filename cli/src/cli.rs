//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::output::json::format_error;

/// Integration tests for managed-service brokers, driven through the cf CLI
#[derive(Parser)]
#[command(
    name = "mits",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suite configuration file [default: ./mits.yaml]
    #[arg(long, global = true, env = "MITS_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (also disabled by a non-empty NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the enabled backend scenarios against the broker
    Run(commands::run::RunArgs),

    /// Validate and show the effective configuration
    Config,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails. In JSON mode the error is
    /// also printed as a JSON error object on stdout.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            config,
            json,
            quiet,
            no_color,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            config,
        });

        let result = match command {
            Command::Run(args) => commands::run::run(&app, &args).await,
            Command::Config => commands::config::run(&app),
        };
        if json && let Err(e) = &result {
            println!("{}", format_error(&format!("{e:#}"), "command_failed")?);
        }
        result
    }
}
