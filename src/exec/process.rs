// src/exec/process.rs

//! One launched task command.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::{AnticronError, Result};
use crate::exec::ExecOptions;
use crate::exec::output::{CapturedOutput, OutputBuffer};

/// Terminal result of a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitResult {
    /// Exit code; `-<signal>` when killed by a signal, `-1` if unknown.
    pub code: i32,
    pub stdout: CapturedOutput,
    pub stderr: CapturedOutput,
}

impl ExitResult {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Background reader that drains one pipe into a bounded buffer so the
/// child never blocks on a full pipe.
struct Drain {
    buffer: Arc<Mutex<OutputBuffer>>,
    handle: JoinHandle<()>,
}

impl Drain {
    fn spawn<R>(reader: R, max_lines: usize) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(OutputBuffer::new(max_lines)));
        let sink = Arc::clone(&buffer);

        let handle = tokio::spawn(async move {
            let mut reader = reader;
            let mut chunk = [0u8; 8192];
            loop {
                match reader.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => sink
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push_bytes(&chunk[..n]),
                    Err(e) => {
                        debug!(error = %e, "output pipe read failed; stopping drain");
                        break;
                    }
                }
            }
        });

        Self { buffer, handle }
    }

    /// Take what has been captured. If the reader is still going (the pipe
    /// is held open by a grandchild, or the last bytes are in flight) it is
    /// aborted so the pipe is closed with the handle.
    fn collect(self) -> CapturedOutput {
        if !self.handle.is_finished() {
            self.handle.abort();
        }
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// A command launched through the host shell.
///
/// The handle never waits on the child: [`ProcessHandle::try_complete`] is a
/// non-blocking check that reaps the child once it has exited.
pub struct ProcessHandle {
    child: Child,
    pid: Option<u32>,
    stdout: Option<Drain>,
    stderr: Option<Drain>,
    exited: Option<ExitStatus>,
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl ProcessHandle {
    /// Launch `command` as `<shell> -c <command>`.
    ///
    /// Must be called from within a Tokio runtime. A shell that cannot be
    /// executed is reported as [`AnticronError::Spawn`].
    pub fn start(task: &str, command: &str, opts: &ExecOptions) -> Result<Self> {
        let mut cmd = Command::new(&opts.shell);
        cmd.arg(shell_flag(&opts.shell)).arg(command);
        cmd.stdin(Stdio::null());

        let capture = opts.output_lines > 0;
        if capture {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let mut child = cmd.spawn().map_err(|source| AnticronError::Spawn {
            task: task.to_string(),
            source,
        })?;

        let pid = child.id();
        let stdout = child
            .stdout
            .take()
            .map(|out| Drain::spawn(out, opts.output_lines));
        let stderr = child
            .stderr
            .take()
            .map(|err| Drain::spawn(err, opts.output_lines));

        debug!(task, pid, shell = %opts.shell, "process launched");

        Ok(Self {
            child,
            pid,
            stdout,
            stderr,
            exited: None,
        })
    }

    /// OS process id, if the child has not been reaped yet.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Non-blocking completion check.
    ///
    /// Returns `Ok(None)` while the process runs. The first call that
    /// observes the exit returns the output captured so far; drains still
    /// held open by a background grandchild are aborted. Later calls report
    /// the same exit code with empty output.
    pub fn try_complete(&mut self) -> Result<Option<ExitResult>> {
        let status = match self.exited {
            Some(status) => status,
            None => match self.child.try_wait()? {
                Some(status) => {
                    self.exited = Some(status);
                    status
                }
                None => return Ok(None),
            },
        };

        let stdout = self.stdout.take().map(Drain::collect).unwrap_or_default();
        let stderr = self.stderr.take().map(Drain::collect).unwrap_or_default();

        Ok(Some(ExitResult {
            code: exit_code(status),
            stdout,
            stderr,
        }))
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        // The child itself is left running; Tokio reaps it in the background.
        for drain in [self.stdout.take(), self.stderr.take()].into_iter().flatten() {
            drain.handle.abort();
        }
        if self.exited.is_none() && self.child.id().is_some() {
            warn!(pid = self.pid, "dropping handle of a process that is still running");
        }
    }
}

fn shell_flag(shell: &str) -> &'static str {
    let is_cmd = Path::new(shell)
        .file_stem()
        .is_some_and(|stem| stem.eq_ignore_ascii_case("cmd"));
    if is_cmd { "/C" } else { "-c" }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|sig| -sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
