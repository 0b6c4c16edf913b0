//! Diagnostics of the command line tool itself, kept off stdout.
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn setup_diagnostics() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}
