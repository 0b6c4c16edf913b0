use std::panic::Location;

use chrono::{DateTime, Local};

use crate::{Field, Level};

/// Source location of the call that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller<'a> {
    pub file: &'a str,
    pub line: u32,
}

impl Caller<'static> {
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl Caller<'_> {
    /// `parent/file.rs:line`, dropping the leading directories.
    pub fn short(&self) -> String {
        let file = self.file.replace('\\', "/");
        let mut parts = file.rsplitn(3, '/');
        let name = parts.next().unwrap_or_default();
        match parts.next() {
            Some(parent) => format!("{}/{}:{}", parent, name, self.line),
            None => format!("{}:{}", name, self.line),
        }
    }
}

/// A single log event as it travels through the dispatcher.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub level: Level,
    pub time: DateTime<Local>,
    pub caller: Option<Caller<'a>>,
    pub message: &'a str,
    pub fields: &'a [Field],
}

impl<'a> Record<'a> {
    /// Stamp a new record with the current local time.
    pub fn new(
        level: Level,
        caller: Option<Caller<'a>>,
        message: &'a str,
        fields: &'a [Field],
    ) -> Self {
        Self {
            level,
            time: Local::now(),
            caller,
            message,
            fields,
        }
    }
}
