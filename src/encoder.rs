//! Human-readable line encoding shared by the console and file sinks.
use console::{style, StyledObject};

use crate::field::write_object;
use crate::{Level, Record};

/// Timestamp layout of the console sink: `YYYY-MM-DD HH:MM:SS.mmm`.
pub const CONSOLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
/// ISO-8601 with milliseconds and UTC offset, used by the file sinks.
pub const FILE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Tab separated `timestamp  LEVEL  caller  message  {fields}` lines.
#[derive(Debug, Clone)]
pub struct Encoder {
    time_format: &'static str,
    colored: bool,
}

impl Encoder {
    pub fn console() -> Self {
        Self {
            time_format: CONSOLE_TIME_FORMAT,
            colored: false,
        }
    }

    pub fn file() -> Self {
        Self {
            time_format: FILE_TIME_FORMAT,
            colored: false,
        }
    }

    /// Colorize the level label. Only meaningful for terminals.
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Append one newline terminated line for `record` to `out`.
    pub fn encode(&self, record: &Record<'_>, out: &mut String) {
        out.push_str(&record.time.format(self.time_format).to_string());
        out.push('\t');
        if self.colored {
            out.push_str(&paint(record.level).to_string());
        } else {
            out.push_str(record.level.as_str());
        }
        if let Some(caller) = &record.caller {
            out.push('\t');
            out.push_str(&caller.short());
        }
        out.push('\t');
        push_escaped(record.message, out);
        if !record.fields.is_empty() {
            out.push('\t');
            write_object(record.fields, out);
        }
        out.push('\n');
    }
}

/// Keep one record on one line and its columns intact.
fn push_escaped(message: &str, out: &mut String) {
    for c in message.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
}

fn paint(level: Level) -> StyledObject<&'static str> {
    let label = style(level.as_str()).for_stdout();
    match level {
        Level::Debug => label.magenta(),
        Level::Info => label.blue(),
        Level::Warn => label.yellow(),
        Level::Error => label.red(),
        Level::Fatal => label.red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field, Caller};
    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;

    fn record<'a>(fields: &'a [crate::Field]) -> Record<'a> {
        Record {
            level: Level::Error,
            time: Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap(),
            caller: Some(Caller {
                file: "src/worker/job.rs",
                line: 88,
            }),
            message: "failed",
            fields,
        }
    }

    #[test]
    fn console_line_layout() {
        let fields = [field("code", 42)];
        let mut out = String::new();
        Encoder::console().encode(&record(&fields), &mut out);
        assert_eq!(
            out,
            "2024-03-01 09:05:07.000\tERROR\tworker/job.rs:88\tfailed\t{\"code\":42}\n"
        );
    }

    #[test]
    fn file_line_uses_iso_timestamp() {
        let mut out = String::new();
        Encoder::file().encode(&record(&[]), &mut out);
        assert!(out.starts_with("2024-03-01T09:05:07.000"));
        assert!(out.ends_with("\tERROR\tworker/job.rs:88\tfailed\n"));
    }

    #[test]
    fn multiline_message_stays_on_one_line() {
        let mut rec = record(&[]);
        rec.message = "first\nsecond\r\n\tindented";
        let mut out = String::new();
        Encoder::file().encode(&rec, &mut out);
        assert_eq!(out.matches('\n').count(), 1);
        assert!(out.ends_with("\tfirst\\nsecond\\r\\n\\tindented\n"), "{}", out);
        assert_eq!(out.split('\t').count(), 4);
    }

    #[test]
    fn missing_caller_is_skipped() {
        let mut rec = record(&[]);
        rec.caller = None;
        let mut out = String::new();
        Encoder::console().encode(&rec, &mut out);
        assert_eq!(out, "2024-03-01 09:05:07.000\tERROR\tfailed\n");
    }
}
