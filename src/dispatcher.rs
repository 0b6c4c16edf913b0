//! Broadcast of records to every registered sink whose threshold admits them.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::sinks::Sink;
use crate::{Level, Record};

/// Write failures are swallowed here: a failing sink neither reaches the
/// caller nor stops the remaining sinks. They are counted and the most
/// recent one is kept for diagnostics.
#[derive(Default)]
pub struct Dispatcher {
    sinks: Vec<Box<dyn Sink>>,
    failures: AtomicU64,
    last_failure: Mutex<Option<String>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sink: Box<dyn Sink>) {
        self.sinks.push(sink);
    }

    pub fn with_sink(mut self, sink: impl Sink + 'static) -> Self {
        self.register(Box::new(sink));
        self
    }

    /// Names of the registered sinks in registration order.
    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    /// Whether any sink would accept a record at `level`.
    pub fn enabled(&self, level: Level) -> bool {
        self.sinks.iter().any(|sink| sink.enabled(level))
    }

    pub fn dispatch(&self, record: &Record<'_>) {
        for sink in self.sinks.iter().filter(|sink| sink.enabled(record.level)) {
            if let Err(e) = sink.write(record) {
                self.failures.fetch_add(1, Ordering::Relaxed);
                let mut last = self.last_failure.lock().unwrap_or_else(|e| e.into_inner());
                *last = Some(format!("{}: {}", sink.name(), e));
            }
        }
    }

    /// Number of sink writes that failed since construction.
    pub fn write_failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// `<sink>: <error>` of the most recent failed write.
    pub fn last_write_error(&self) -> Option<String> {
        self.last_failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    /// Records the levels it receives.
    struct Recorder {
        name: &'static str,
        threshold: Level,
        seen: Arc<Mutex<Vec<Level>>>,
    }

    impl Sink for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn enabled(&self, level: Level) -> bool {
            level >= self.threshold
        }

        fn write(&self, record: &Record<'_>) -> io::Result<()> {
            self.seen.lock().unwrap().push(record.level);
            Ok(())
        }
    }

    struct Broken;

    impl Sink for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn enabled(&self, _level: Level) -> bool {
            true
        }

        fn write(&self, _record: &Record<'_>) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    fn recorder(name: &'static str, threshold: Level) -> (Recorder, Arc<Mutex<Vec<Level>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Recorder {
                name,
                threshold,
                seen: seen.clone(),
            },
            seen,
        )
    }

    #[test]
    fn each_sink_filters_independently() {
        let (console, console_seen) = recorder("console", Level::Debug);
        let (info, info_seen) = recorder("info", Level::Info);
        let (error, error_seen) = recorder("error", Level::Error);
        let dispatcher = Dispatcher::new()
            .with_sink(info)
            .with_sink(error)
            .with_sink(console);

        for level in Level::ALL {
            dispatcher.dispatch(&Record::new(level, None, "m", &[]));
        }

        assert_eq!(console_seen.lock().unwrap().as_slice(), &Level::ALL);
        assert_eq!(
            info_seen.lock().unwrap().as_slice(),
            &[Level::Info, Level::Warn, Level::Error, Level::Fatal]
        );
        assert_eq!(
            error_seen.lock().unwrap().as_slice(),
            &[Level::Error, Level::Fatal]
        );
        assert_eq!(dispatcher.sink_names(), vec!["info", "error", "console"]);
    }

    #[test]
    fn failed_writes_are_counted_not_propagated() {
        let (after, after_seen) = recorder("after", Level::Debug);
        let dispatcher = Dispatcher::new().with_sink(Broken).with_sink(after);

        dispatcher.dispatch(&Record::new(Level::Error, None, "m", &[]));
        dispatcher.dispatch(&Record::new(Level::Info, None, "m", &[]));

        assert_eq!(dispatcher.write_failures(), 2);
        assert_eq!(
            dispatcher.last_write_error().as_deref(),
            Some("broken: disk full")
        );
        assert_eq!(after_seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn enabled_reflects_lowest_threshold() {
        let (error, _) = recorder("error", Level::Error);
        let dispatcher = Dispatcher::new().with_sink(error);
        assert!(!dispatcher.enabled(Level::Warn));
        assert!(dispatcher.enabled(Level::Error));
        assert!(!Dispatcher::new().enabled(Level::Fatal));
    }
}
