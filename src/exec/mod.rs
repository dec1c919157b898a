// src/exec/mod.rs

//! Process execution layer.
//!
//! This module launches task commands through the configured shell using
//! `tokio::process::Command` and lets the caller poll them without ever
//! waiting on a child.
//!
//! - [`process`] owns one launched command ([`ProcessHandle`]) and its
//!   non-blocking completion check.
//! - [`output`] holds the bounded line buffers that stdout/stderr are
//!   drained into while the process runs.

pub mod output;
pub mod process;

pub use output::{CapturedOutput, OutputBuffer};
pub use process::{ExitResult, ProcessHandle};

/// Spawn options shared by every task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    /// Shell binary; commands run as `<shell> -c <command>`.
    pub shell: String,
    /// Lines kept per output stream. `0` discards output entirely.
    pub output_lines: usize,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            shell: crate::config::model::default_shell(),
            output_lines: crate::config::model::default_output_lines(),
        }
    }
}
