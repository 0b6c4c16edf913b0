use std::panic::Location;
use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::sinks::{prune_expired_backups, FileSink, RotationPolicy, Sink, StreamSink};
use crate::{Caller, Dispatcher, Field, Level, LogConfig, Record, Result};

/// Cheaply clonable handle over a shared [`Dispatcher`].
#[derive(Clone)]
pub struct Logger {
    dispatcher: Arc<Dispatcher>,
}

impl Logger {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Info file, error file and stdout, dated today.
    pub fn from_config(config: &LogConfig) -> Result<Self> {
        Self::for_date(config, Local::now().date_naive(), StreamSink::stdout())
    }

    /// Build the three standard sinks with files named after `date` and an
    /// arbitrary console sink. Expired rotated backups are pruned first.
    pub fn for_date(
        config: &LogConfig,
        date: NaiveDate,
        console: impl Sink + 'static,
    ) -> Result<Self> {
        let policy = RotationPolicy::FIXED;
        let dir = config.log_directory.as_path();
        let base = config.base_log_name.as_str();

        let info = FileSink::open(dir, base, date, Level::Info, &policy)?;
        let error = FileSink::open(dir, base, date, Level::Error, &policy)?;
        // Best effort, stale backups only cost disk space.
        let _ = prune_expired_backups(dir, base, policy.max_age(), Local::now());

        Ok(Self::new(
            Dispatcher::new()
                .with_sink(info)
                .with_sink(error)
                .with_sink(console),
        ))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: &[Field]) {
        let caller = Caller::from_location(Location::caller());
        self.dispatch(&Record::new(level, Some(caller), message, fields));
    }

    /// Forward an already built record, e.g. from a bridge.
    pub fn dispatch(&self, record: &Record<'_>) {
        self.dispatcher.dispatch(record);
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.log(Level::Debug, message, fields);
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.log(Level::Info, message, fields);
    }

    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field]) {
        self.log(Level::Warn, message, fields);
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.log(Level::Error, message, fields);
    }

    /// Logs at [`Level::Fatal`]. Does not exit the process.
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Field]) {
        self.log(Level::Fatal, message, fields);
    }
}

/// The narrow surface components depend on instead of the concrete logger.
pub trait Log: Send + Sync {
    fn log_info(&self, message: &str, fields: &[Field]);
    fn log_error(&self, message: &str, fields: &[Field]);
}

impl Log for Logger {
    #[track_caller]
    fn log_info(&self, message: &str, fields: &[Field]) {
        self.info(message, fields);
    }

    #[track_caller]
    fn log_error(&self, message: &str, fields: &[Field]) {
        self.error(message, fields);
    }
}
