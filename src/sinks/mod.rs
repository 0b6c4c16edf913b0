//! Destinations for encoded records: the `Sink` trait plus the stream and
//! rotating file implementations.
use std::io::{self, Write};
use std::sync::Mutex;

use crate::encoder::Encoder;
use crate::{Level, Record};

mod file;

pub use file::{file_name, prune_expired_backups, FileSink, RotationPolicy};

/// An observer of log records: an admission predicate plus a write action.
pub trait Sink: Send + Sync {
    fn name(&self) -> &str;

    /// Whether a record at `level` should reach this sink.
    fn enabled(&self, level: Level) -> bool;

    /// Encode and write one record. Implementations write the whole line
    /// under their own lock so concurrent callers never interleave.
    fn write(&self, record: &Record<'_>) -> io::Result<()>;
}

/// A sink over any `Write` implementation, e.g. stdout.
pub struct StreamSink<W> {
    name: String,
    threshold: Level,
    encoder: Encoder,
    writer: Mutex<W>,
}

impl<W: Write + Send> StreamSink<W> {
    pub fn new(name: impl Into<String>, threshold: Level, encoder: Encoder, writer: W) -> Self {
        Self {
            name: name.into(),
            threshold,
            encoder,
            writer: Mutex::new(writer),
        }
    }
}

impl StreamSink<io::Stdout> {
    /// The console sink: every level, console timestamps, colored level
    /// labels when stdout supports them.
    pub fn stdout() -> Self {
        Self::new(
            "console",
            Level::Debug,
            Encoder::console().colored(console::colors_enabled()),
            io::stdout(),
        )
    }
}

impl<W: Write + Send> Sink for StreamSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, level: Level) -> bool {
        level >= self.threshold
    }

    fn write(&self, record: &Record<'_>) -> io::Result<()> {
        let mut line = String::new();
        self.encoder.encode(record, &mut line);
        // A panicking writer must not disable the sink for everyone else.
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }
}
