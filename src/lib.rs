#![forbid(unsafe_code)]
//! Process-wide logging facade.
//!
//! Records go to three sinks at once: `<base>_<date>_info.log` (info and
//! above), `<base>_<date>_error.log` (error and above) and stdout (every
//! level). Both files rotate at 100 MB and keep seven backups for at most
//! seven days.
//!
//! ```no_run
//! use tierlog::{field, LogConfig};
//!
//! tierlog::init(LogConfig::new("/tmp/logs", "app"))?;
//! tierlog::info("started", &[]);
//! tierlog::error("failed", &[field("code", 42)]);
//! # Ok::<(), tierlog::Error>(())
//! ```
//!
//! Components that should not depend on global state take a [`Logger`]
//! or an `Arc<dyn Log>` instead.
use std::sync::OnceLock;

mod bridge;
mod config;
mod dispatcher;
mod encoder;
mod error;
mod field;
mod level;
mod logger;
mod record;
pub mod sinks;

pub use bridge::TierLayer;
pub use crate::config::LogConfig;
pub use dispatcher::Dispatcher;
pub use encoder::{Encoder, CONSOLE_TIME_FORMAT, FILE_TIME_FORMAT};
pub use error::Error;
pub use field::{field, Field};
pub use level::Level;
pub use logger::{Log, Logger};
pub use record::{Caller, Record};

pub type Result<T> = std::result::Result<T, Error>;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Build the standard sinks for `config` and install them process-wide.
///
/// Fails if the directory or tier files cannot be opened, or if the
/// process-wide logger already exists.
pub fn init(config: LogConfig) -> Result<()> {
    if GLOBAL.get().is_some() {
        return Err(Error::AlreadyInitialized);
    }
    set_global(Logger::from_config(&config)?)
}

/// Install an already built logger process-wide.
pub fn set_global(logger: Logger) -> Result<()> {
    GLOBAL.set(logger).map_err(|_| Error::AlreadyInitialized)
}

pub fn try_global() -> Option<&'static Logger> {
    GLOBAL.get()
}

/// The process-wide logger.
///
/// # Panics
///
/// If neither [`init`] nor [`set_global`] has run.
#[track_caller]
pub fn global() -> &'static Logger {
    match GLOBAL.get() {
        Some(logger) => logger,
        None => panic!("tierlog::init must be called before logging"),
    }
}

/// Log at info level through the process-wide logger.
///
/// # Panics
///
/// If the process-wide logger has not been initialized.
#[track_caller]
pub fn info(message: &str, fields: &[Field]) {
    global().info(message, fields);
}

/// Log at error level through the process-wide logger.
///
/// # Panics
///
/// If the process-wide logger has not been initialized.
#[track_caller]
pub fn error(message: &str, fields: &[Field]) {
    global().error(message, fields);
}
