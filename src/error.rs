use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up logging. Writing records never fails
/// from the caller's point of view.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot create log directory {}: {source}", .dir.display())]
    Directory {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open {tier} log file in {}: {source}", .dir.display())]
    FileSink {
        tier: &'static str,
        dir: PathBuf,
        #[source]
        source: flexi_logger::FlexiLoggerError,
    },

    #[error("the process-wide logger is already initialized")]
    AlreadyInitialized,

    #[error("cannot install the log crate bridge: {0}")]
    Bridge(#[from] log::SetLoggerError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
