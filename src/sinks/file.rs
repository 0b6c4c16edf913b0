use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDate};
use flexi_logger::writers::{ArcFileLogWriter, FileLogWriter, FileLogWriterHandle};
use flexi_logger::{Cleanup, Criterion, FileSpec, Naming, WriteMode};

use super::Sink;
use crate::encoder::Encoder;
use crate::{Error, Level, Record, Result};

/// When and how a tier file is rotated.
///
/// Rotated backups are never compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate once the live file grows past this many bytes.
    pub max_size_bytes: u64,
    /// Rotated backups kept per tier file.
    pub max_backups: usize,
    /// Rotated backups older than this are removed at startup and after
    /// each rotation.
    pub max_age_days: i64,
    /// Stamp rotated file names with local time instead of UTC.
    pub local_time: bool,
}

impl RotationPolicy {
    /// 100 MB files, 7 backups, 7 days, local time.
    pub const FIXED: RotationPolicy = RotationPolicy {
        max_size_bytes: 100 * 1024 * 1024,
        max_backups: 7,
        max_age_days: 7,
        local_time: true,
    };

    pub fn max_age(&self) -> Duration {
        Duration::days(self.max_age_days)
    }
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::FIXED
    }
}

/// `<base>_<YYYY-MM-DD>_<tier>.log`
pub fn file_name(base: &str, date: NaiveDate, tier: Level) -> String {
    format!("{}.log", stem(base, date, tier))
}

fn stem(base: &str, date: NaiveDate, tier: Level) -> String {
    format!("{}_{}_{}", base, date.format("%Y-%m-%d"), tier.suffix())
}

/// Infix of rotated backups; the live file carries none.
const ROTATED_INFIX_FORMAT: &str = "r%Y-%m-%d_%H-%M-%S";

/// A size-rotated log file admitting records at or above one tier.
pub struct FileSink {
    path: PathBuf,
    dir: PathBuf,
    base: String,
    threshold: Level,
    policy: RotationPolicy,
    encoder: Encoder,
    output: Mutex<Output>,
    // Dropping the handle shuts the writer down.
    _handle: FileLogWriterHandle,
}

struct Output {
    writer: ArcFileLogWriter,
    // Mirrors the writer's size counter so rotations can be observed.
    size: u64,
}

impl FileSink {
    /// Prepare `<dir>/<base>_<date>_<tier>.log`, creating the directory if
    /// needed. The file itself is opened for appending on the first write.
    pub fn open(
        dir: &Path,
        base: &str,
        date: NaiveDate,
        threshold: Level,
        policy: &RotationPolicy,
    ) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|source| Error::Directory {
            dir: dir.to_path_buf(),
            source,
        })?;

        let spec = FileSpec::default()
            .directory(dir)
            .basename(stem(base, date, threshold))
            .suppress_timestamp();
        let mut builder = FileLogWriter::builder(spec)
            .rotate(
                Criterion::Size(policy.max_size_bytes),
                Naming::TimestampsCustomFormat {
                    current_infix: Some(""),
                    format: ROTATED_INFIX_FORMAT,
                },
                Cleanup::KeepLogFiles(policy.max_backups),
            )
            .cleanup_in_background_thread(false)
            .write_mode(WriteMode::Direct)
            .append();
        if !policy.local_time {
            builder = builder.use_utc();
        }
        let (writer, handle) =
            builder
                .try_build_with_handle()
                .map_err(|source| Error::FileSink {
                    tier: threshold.suffix(),
                    dir: dir.to_path_buf(),
                    source,
                })?;

        let path = dir.join(file_name(base, date, threshold));
        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            path,
            dir: dir.to_path_buf(),
            base: base.to_string(),
            threshold,
            policy: *policy,
            encoder: Encoder::file(),
            output: Mutex::new(Output { writer, size }),
            _handle: handle,
        })
    }

    /// Path of the live (not yet rotated) file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        self.threshold.suffix()
    }

    fn enabled(&self, level: Level) -> bool {
        level >= self.threshold
    }

    fn write(&self, record: &Record<'_>) -> io::Result<()> {
        let mut line = String::new();
        self.encoder.encode(record, &mut line);

        let rotated = {
            let mut output = self.output.lock().unwrap_or_else(|e| e.into_inner());
            // The writer rotates before a write once the limit is exceeded.
            let rotated = output.size > self.policy.max_size_bytes;
            output.writer.write_all(line.as_bytes())?;
            output.writer.flush()?;
            let written = line.len() as u64;
            output.size = if rotated {
                written
            } else {
                output.size + written
            };
            rotated
        };

        if rotated {
            // Best effort, stale backups only cost disk space.
            let _ = prune_expired_backups(
                &self.dir,
                &self.base,
                self.policy.max_age(),
                Local::now(),
            );
        }
        Ok(())
    }
}

/// Whether `name` is a rotated backup of some tier file of `base`.
fn is_rotated_backup(name: &str, base: &str) -> bool {
    let Some(rest) = name
        .strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('_'))
    else {
        return false;
    };
    if !rest.ends_with(".log") {
        return false;
    }
    Level::ALL.iter().any(|tier| {
        let marker = format!("_{}_r", tier.suffix());
        rest.find(&marker).is_some_and(|at| {
            rest[at + marker.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        })
    })
}

/// Remove rotated backups of `base` in `dir` last modified more than
/// `max_age` before `now`. Returns the number of files removed.
///
/// Live tier files are never touched. Entries that cannot be inspected or
/// removed are skipped.
pub fn prune_expired_backups(
    dir: &Path,
    base: &str,
    max_age: Duration,
    now: DateTime<Local>,
) -> io::Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !is_rotated_backup(name, base) {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        let modified: DateTime<Local> = modified.into();
        if now.signed_duration_since(modified) > max_age && fs::remove_file(entry.path()).is_ok()
        {
            removed += 1;
        }
    }
    Ok(removed)
}
