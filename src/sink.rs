// src/sink.rs

//! Lifecycle log sinks.
//!
//! Tasks report human-readable lifecycle lines ("Starting task ...",
//! "Task stopped ...") through [`LogSink`]. Writing is infallible from the
//! caller's point of view: a sink that cannot write falls back to stdout.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local};

/// Destination for lifecycle lines. One call per line, no trailing newline.
pub trait LogSink: Send + Sync {
    fn write(&self, line: &str);
}

/// Format a timestamp the way lifecycle lines start.
pub fn timestamp(now: &DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Writes lines to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
    }
}

/// Appends lines to a file.
///
/// If the file cannot be opened or written, a notice goes to stderr, the
/// line is echoed to stdout, and the open is retried on the next write.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = match open_append(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                fallback_notice(&path, &e);
                None
            }
        };
        Self {
            path,
            file: Mutex::new(file),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn write(&self, line: &str) {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);

        if guard.is_none() {
            match open_append(&self.path) {
                Ok(file) => *guard = Some(file),
                Err(_) => {
                    StdoutSink.write(line);
                    return;
                }
            }
        }

        let failed = match guard.as_mut() {
            Some(file) => writeln!(file, "{line}").and_then(|_| file.flush()).err(),
            None => None,
        };
        if let Some(e) = failed {
            fallback_notice(&self.path, &e);
            StdoutSink.write(line);
            *guard = None;
        }
    }
}

/// Build the sink for the configured `logfile` (`None` means stdout).
pub fn sink_from_config(logfile: Option<&Path>) -> Box<dyn LogSink> {
    match logfile {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(StdoutSink),
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn fallback_notice(path: &Path, err: &std::io::Error) {
    eprintln!("anticron: cannot write log file {path:?} ({err}); logging to stdout");
    tracing::warn!(path = ?path, error = %err, "log file unavailable");
}
