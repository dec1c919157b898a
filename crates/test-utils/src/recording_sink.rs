use std::sync::{Arc, Mutex};

use anticron::sink::LogSink;

/// A `LogSink` that keeps every line in memory.
///
/// Clones share the same buffer, so a test can hand one clone to the
/// scheduler and inspect the lines through another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Return and forget the lines recorded so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap())
    }

    /// Lines that contain `needle`.
    pub fn matching(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.contains(needle))
            .collect()
    }
}

impl LogSink for RecordingSink {
    fn write(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
