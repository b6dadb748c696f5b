//! Rulebook CLI
//!
//! Validates tabular data against a CSV rule book and tallies column
//! combinations.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::RulebookConfig;

/// Rulebook CLI: check rows against a rule book.
#[derive(Parser, Debug)]
#[command(name = "rulebook", version, about)]
struct Cli {
    /// Path to the TOML configuration file. Ignored if it does not exist.
    #[arg(
        long,
        env = "RULEBOOK_CONFIG",
        default_value = "rulebook.toml",
        global = true
    )]
    config: PathBuf,

    /// Identifier column, overriding `[columns] identifier`.
    #[arg(long, env = "RULEBOOK_IDENTIFIER_COLUMN", global = true)]
    identifier_column: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a data table and write it back annotated.
    Validate(commands::validate::ValidateArgs),
    /// Inspect a rule book.
    Rules(commands::rules::RulesArgs),
    /// Count occurrences of column-value combinations.
    Count(commands::count::CountArgs),
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = RulebookConfig::load(&cli.config)?;
    if let Some(column) = cli.identifier_column {
        config.columns.identifier = column;
    }

    match cli.command {
        Command::Validate(args) => commands::validate::run(&config, &args, &cli.format),
        Command::Rules(args) => commands::rules::run(&config, &args, &cli.format),
        Command::Count(args) => commands::count::run(&config, &args, &cli.format),
    }
}
