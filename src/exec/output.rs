// src/exec/output.rs

//! Bounded capture of a child's output stream.

use std::collections::VecDeque;

/// Longest line kept, in bytes. The rest of an over-long line is discarded.
pub const MAX_LINE_BYTES: usize = 4096;

/// Ring buffer of the most recent output lines of one stream.
///
/// Bytes are fed in arbitrary chunks; lines are split on `\n`, decoded
/// lossily and trimmed of a trailing `\r`. Once `max_lines` is reached the
/// oldest line is dropped and counted.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    max_lines: usize,
    lines: VecDeque<String>,
    partial: Vec<u8>,
    dropped: usize,
}

/// Output collected from one stream of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub lines: Vec<String>,
    /// Number of older lines that did not fit in the buffer.
    pub dropped: usize,
}

impl CapturedOutput {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.dropped == 0
    }
}

impl OutputBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            max_lines,
            lines: VecDeque::with_capacity(max_lines.min(64)),
            partial: Vec::new(),
            dropped: 0,
        }
    }

    pub fn push_bytes(&mut self, mut chunk: &[u8]) {
        while let Some(pos) = chunk.iter().position(|&b| b == b'\n') {
            self.extend_partial(&chunk[..pos]);
            self.commit_partial();
            chunk = &chunk[pos + 1..];
        }
        self.extend_partial(chunk);
    }

    /// Commit any trailing line that was not newline-terminated and hand
    /// back everything captured so far, leaving the buffer empty.
    pub fn take(&mut self) -> CapturedOutput {
        if !self.partial.is_empty() {
            self.commit_partial();
        }
        CapturedOutput {
            lines: self.lines.drain(..).collect(),
            dropped: std::mem::take(&mut self.dropped),
        }
    }

    fn extend_partial(&mut self, bytes: &[u8]) {
        let room = MAX_LINE_BYTES.saturating_sub(self.partial.len());
        self.partial.extend_from_slice(&bytes[..bytes.len().min(room)]);
    }

    fn commit_partial(&mut self) {
        let line = String::from_utf8_lossy(&self.partial)
            .trim_end_matches('\r')
            .to_string();
        self.partial.clear();

        if self.max_lines == 0 {
            self.dropped += 1;
            return;
        }
        if self.lines.len() == self.max_lines {
            self.lines.pop_front();
            self.dropped += 1;
        }
        self.lines.push_back(line);
    }
}
