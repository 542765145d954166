//! logship - buffered binary log shipping
//!
//! # Usage
//!
//! ```bash
//! # Ship stdin lines (default command)
//! tail -f app.log | logship --log-type app
//! logship --config configs/logship.toml ship --log-type nginx.access --property env=prod
//!
//! # Validate a config file and show how log types route
//! logship --config configs/logship.toml check nginx.access audit.login
//! ```

mod cmd;
mod loopback;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use logship_config::{Config, LogConfig, LogFormat, LogLevel, LogOutput};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// logship - buffered binary log shipping
#[derive(Parser, Debug)]
#[command(name = "logship")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<LogLevel>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ship stdin lines through the arena pipeline and print decoded frames
    Ship(cmd::ship::ShipArgs),

    /// Validate configuration and resolve log types against the routes
    Check(cmd::check::CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Check(args)) => {
            // Check prints to stdout and needs no logging
            cmd::check::run(&config, args)
        }
        Some(Command::Ship(args)) => {
            init_logging(&config.log, cli.log_level)?;
            cmd::ship::run(config, args).await
        }
        None => {
            init_logging(&config.log, cli.log_level)?;
            cmd::ship::run(config, cmd::ship::ShipArgs::default()).await
        }
    }
}

/// Load the config file if one was given, otherwise use defaults
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Initialize the tracing subscriber: CLI level > config file
fn init_logging(log: &LogConfig, cli_level: Option<LogLevel>) -> Result<()> {
    let log = effective_log_config(log, cli_level);
    let filter = EnvFilter::try_new(log.filter_directive())
        .map_err(|e| anyhow::anyhow!("invalid log filter: {}", e))?;

    let writer = match log.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    match log.format {
        LogFormat::Console => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(writer).with_target(true))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(writer))
            .with(filter)
            .init(),
    }

    Ok(())
}

fn effective_log_config(log: &LogConfig, cli_level: Option<LogLevel>) -> LogConfig {
    LogConfig {
        level: cli_level.unwrap_or(log.level),
        ..log.clone()
    }
}
