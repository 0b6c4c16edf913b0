//! Adapters feeding `tracing` events and `log` records into a [`Logger`].
use std::fmt;

use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::{Caller, Field, Level, Logger, Record, Result};

/// A `tracing_subscriber` layer forwarding every event to the tiered sinks.
///
/// ```no_run
/// use tracing_subscriber::prelude::*;
///
/// let logger = tierlog::Logger::from_config(&tierlog::LogConfig::default())?;
/// tracing_subscriber::registry()
///     .with(tierlog::TierLayer::new(logger))
///     .init();
/// tracing::error!(code = 42, "failed");
/// # Ok::<(), tierlog::Error>(())
/// ```
pub struct TierLayer {
    logger: Logger,
}

impl TierLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl<S: Subscriber> Layer<S> for TierLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);

        let caller = meta.file().map(|file| Caller {
            file,
            line: meta.line().unwrap_or(0),
        });
        self.logger.dispatch(&Record::new(
            Level::from(*meta.level()),
            caller,
            &visitor.message,
            &visitor.fields,
        ));
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: Vec<Field>,
}

impl Visit for FieldCollector {
    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(Field::new(field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .push(Field::new(field.name(), format!("{:?}", value)));
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.dispatcher().enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record<'_>) {
        let level = Level::from(record.level());
        if !self.dispatcher().enabled(level) {
            return;
        }
        let message = record.args().to_string();
        let caller = record.file().map(|file| Caller {
            file,
            line: record.line().unwrap_or(0),
        });
        self.dispatch(&Record::new(level, caller, &message, &[]));
    }

    fn flush(&self) {}
}

impl Logger {
    /// Route the `log` crate macros to this logger. Fails when another
    /// `log` backend is already installed.
    pub fn install_log_bridge(&self) -> Result<()> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}
