#![allow(dead_code)]
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tierlog::sinks::StreamSink;
use tierlog::{Encoder, Level, LogConfig, Logger};

/// In-memory console shared between the sink and the test.
#[derive(Clone, Default)]
pub struct Console(Arc<Mutex<Vec<u8>>>);

impl Write for Console {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Console {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

/// Standard tier files under `dir` dated 2024-03-01, console captured.
pub fn logger(dir: &Path, base: &str) -> (Logger, Console) {
    let console = Console::default();
    let sink = StreamSink::new("console", Level::Debug, Encoder::console(), console.clone());
    let logger = Logger::for_date(&LogConfig::new(dir, base), date(), sink).unwrap();
    (logger, console)
}

/// Lines of a log file that must exist.
pub fn read_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => text.lines().map(str::to_string).collect(),
        Err(e) => panic!("reading {}: {}", path.display(), e),
    }
}

/// Everything after the timestamp column.
pub fn without_timestamp(line: &str) -> &str {
    line.split_once('\t').map(|(_, rest)| rest).unwrap_or(line)
}
