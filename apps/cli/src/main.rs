//! `weave`: inspect, normalize and copy behaviour graph files.

mod commands;
mod config;
mod graph;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::copy::CopyArgs;
use crate::commands::inspect::InspectArgs;
use crate::commands::normalize::NormalizeArgs;
use crate::config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "weave", version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "weave.toml", env = "WEAVE_CONFIG")]
    config: PathBuf,

    /// Log filter directives, overriding the configuration
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format: pretty, compact or json
    #[arg(long, global = true, value_parser = parse_format)]
    log_format: Option<weave_log::Format>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a graph and summarize its items and load problems
    Inspect(InspectArgs),
    /// Rewrite a graph with positional ids, dropping unloadable items
    Normalize(NormalizeArgs),
    /// Print the partial-copy batch for the given item ids
    Copy(CopyArgs),
}

fn parse_format(s: &str) -> Result<weave_log::Format, String> {
    weave_log::Format::parse(s).ok_or_else(|| format!("unknown log format `{s}`"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(&cli.config)?;
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    if let Some(format) = cli.log_format {
        config.log.format = format;
    }
    let _guard = weave_log::init_with(config.log.clone())?;

    match &cli.command {
        Command::Inspect(args) => args.execute(&config),
        Command::Normalize(args) => args.execute(&config),
        Command::Copy(args) => args.execute(&config),
    }
}
