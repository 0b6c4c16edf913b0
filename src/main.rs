use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tierlog::{Field, LogConfig};
use tracing::{debug, info};

mod logging;

#[derive(Parser)]
#[command(
    name = "tierlog",
    version,
    about = "Append a record to severity-split rotating log files"
)]
struct Args {
    /// Log directory, overrides the configured one
    #[arg(short = 'd', long = "dir")]
    dir: Option<PathBuf>,
    /// Base file name, overrides the configured one
    #[arg(short = 'b', long = "base")]
    base: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log at info level
    Info(Entry),
    /// Log at error level
    Error(Entry),
}

#[derive(ClapArgs)]
struct Entry {
    message: String,
    /// Structured fields as key=value
    #[arg(value_parser = parse_field)]
    fields: Vec<Field>,
}

/// `key=value`, where the value becomes a number or bool when it parses as
/// one and a string otherwise.
fn parse_field(raw: &str) -> Result<Field, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))?;
    if key.is_empty() {
        return Err(format!("empty key in `{}`", raw));
    }
    let key = key.to_string();
    let field = if let Ok(n) = value.parse::<i64>() {
        Field::new(key, n)
    } else if let Ok(n) = value.parse::<u64>() {
        Field::new(key, n)
    } else if let Ok(n) = value.parse::<f64>() {
        Field::new(key, n)
    } else if let Ok(b) = value.parse::<bool>() {
        Field::new(key, b)
    } else {
        Field::new(key, value)
    };
    Ok(field)
}

fn main() -> Result<()> {
    logging::setup_diagnostics()?;

    let args = Args::parse();

    let mut config = LogConfig::load().context("Failed to load configuration")?;
    if let Some(dir) = args.dir {
        config.log_directory = dir;
    }
    if let Some(base) = args.base {
        config.base_log_name = base;
    }
    debug!(?config, "resolved configuration");

    tierlog::init(config.clone()).with_context(|| {
        format!(
            "Failed to initialize logging in {}",
            config.log_directory.display()
        )
    })?;

    match args.command {
        Command::Info(entry) => tierlog::info(&entry.message, &entry.fields),
        Command::Error(entry) => tierlog::error(&entry.message, &entry.fields),
    }

    let logger = tierlog::global();
    if logger.dispatcher().write_failures() > 0 {
        anyhow::bail!(
            "Record was not written everywhere: {}",
            logger
                .dispatcher()
                .last_write_error()
                .unwrap_or_default()
        );
    }
    info!(dir = %config.log_directory.display(), "record written");
    Ok(())
}
