// src/engine/task.rs

//! Per-task process lifecycle and health state.

use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, error, info, warn};

use crate::config::TaskConfig;
use crate::errors::AnticronError;
use crate::exec::{CapturedOutput, ExecOptions, ExitResult, ProcessHandle};
use crate::metrics::{Gauge, MetricsSink};
use crate::schedule::DailyTime;
use crate::sink::{LogSink, timestamp};
use crate::types::TaskStatus;

/// What a trigger did.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// A new process was launched.
    Started,
    /// The previous run is still going; nothing was launched.
    Stuck,
    /// The shell could not be launched; the task stays idle.
    SpawnFailed(AnticronError),
}

/// Point-in-time values of the six exported gauges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskMetrics {
    pub last_exit_code: i32,
    pub status: TaskStatus,
    pub last_result: bool,
    /// Unix seconds, `0.0` if the task never succeeded.
    pub last_success_timestamp: f64,
    /// Seconds.
    pub last_duration: f64,
    /// Unix seconds, `0.0` if the task never started.
    pub last_start_timestamp: f64,
}

impl TaskMetrics {
    pub fn gauges(&self) -> [(Gauge, f64); 6] {
        [
            (Gauge::LastExitCode, f64::from(self.last_exit_code)),
            (Gauge::TaskStatus, self.status.gauge_value()),
            (Gauge::LastTaskResult, if self.last_result { 1.0 } else { 0.0 }),
            (Gauge::LastSuccessTimestamp, self.last_success_timestamp),
            (Gauge::LastTaskDuration, self.last_duration),
            (Gauge::LastTaskStartTimestamp, self.last_start_timestamp),
        ]
    }
}

/// A named daily command and the state of its most recent run.
///
/// A task owns at most one [`ProcessHandle`]. The exit code, result and
/// duration are only written together, when a completion is observed.
#[derive(Debug)]
pub struct Task {
    name: String,
    command: String,
    time_at: DailyTime,
    exec: ExecOptions,

    status: TaskStatus,
    last_exit_code: i32,
    last_result: bool,
    last_success: Option<DateTime<Local>>,
    last_duration: Duration,
    last_start: Option<DateTime<Local>>,
    process: Option<ProcessHandle>,
}

impl Task {
    pub fn new(cfg: &TaskConfig, exec: ExecOptions) -> Self {
        Self {
            name: cfg.name.clone(),
            command: cfg.command.clone(),
            time_at: cfg.time_at,
            exec,
            status: TaskStatus::Idle,
            last_exit_code: 0,
            last_result: false,
            last_success: None,
            last_duration: Duration::ZERO,
            last_start: None,
            process: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn time_at(&self) -> DailyTime {
        self.time_at
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn last_exit_code(&self) -> i32 {
        self.last_exit_code
    }

    pub fn last_result(&self) -> bool {
        self.last_result
    }

    pub fn last_success(&self) -> Option<DateTime<Local>> {
        self.last_success
    }

    pub fn last_start(&self) -> Option<DateTime<Local>> {
        self.last_start
    }

    pub fn last_duration(&self) -> Duration {
        self.last_duration
    }

    /// Pid of the in-flight process, if any.
    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().and_then(ProcessHandle::pid)
    }

    pub fn has_process(&self) -> bool {
        self.process.is_some()
    }

    /// Check the in-flight process without blocking, using the current time.
    pub fn poll(&mut self, sink: &dyn LogSink) -> Option<i32> {
        self.poll_at(Local::now(), sink)
    }

    /// Check the in-flight process without blocking.
    ///
    /// Returns the exit code when a completion was observed by this call.
    /// An idle task is left untouched and nothing is logged.
    pub fn poll_at(&mut self, now: DateTime<Local>, sink: &dyn LogSink) -> Option<i32> {
        let handle = self.process.as_mut()?;

        let result = match handle.try_complete() {
            Ok(None) => return None,
            Ok(Some(result)) => result,
            Err(e) => {
                error!(task = %self.name, error = %e, "cannot query process status; releasing it");
                ExitResult {
                    code: -1,
                    stdout: CapturedOutput::default(),
                    stderr: CapturedOutput::default(),
                }
            }
        };

        let code = result.code;
        self.finish(now, result, sink);
        Some(code)
    }

    /// Trigger a run using the current time.
    pub fn trigger(&mut self, sink: &dyn LogSink) -> TriggerOutcome {
        self.trigger_at(Local::now(), sink)
    }

    /// Scheduled trigger.
    ///
    /// A completion that already happened is recorded first. If the previous
    /// run is still going the task is marked stuck and the run is skipped.
    pub fn trigger_at(&mut self, now: DateTime<Local>, sink: &dyn LogSink) -> TriggerOutcome {
        self.poll_at(now, sink);

        if self.process.is_some() {
            warn!(
                task = %self.name,
                pid = self.pid(),
                "previous run still in progress; skipping this run"
            );
            self.status = TaskStatus::Stuck;
            return TriggerOutcome::Stuck;
        }

        match ProcessHandle::start(&self.name, &self.command, &self.exec) {
            Ok(handle) => {
                info!(task = %self.name, pid = handle.pid(), cmd = %self.command, "task started");
                self.process = Some(handle);
                self.last_start = Some(now);
                self.status = TaskStatus::Running;
                sink.write(&format!(
                    "{} Starting task {}:{}",
                    timestamp(&now),
                    self.name,
                    self.command
                ));
                TriggerOutcome::Started
            }
            Err(e) => {
                let reason = match &e {
                    AnticronError::Spawn { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                error!(task = %self.name, error = %reason, "failed to start task");
                sink.write(&format!(
                    "{} Failed to start task {}: {}",
                    timestamp(&now),
                    self.name,
                    reason
                ));
                TriggerOutcome::SpawnFailed(e)
            }
        }
    }

    pub fn snapshot(&self) -> TaskMetrics {
        TaskMetrics {
            last_exit_code: self.last_exit_code,
            status: self.status,
            last_result: self.last_result,
            last_success_timestamp: self.last_success.as_ref().map_or(0.0, unix_seconds),
            last_duration: self.last_duration.as_secs_f64(),
            last_start_timestamp: self.last_start.as_ref().map_or(0.0, unix_seconds),
        }
    }

    /// Write the six gauges for this task.
    pub fn publish(&self, metrics: &mut dyn MetricsSink) {
        for (gauge, value) in self.snapshot().gauges() {
            metrics.set(gauge, &self.name, value);
        }
    }

    fn finish(&mut self, now: DateTime<Local>, result: ExitResult, sink: &dyn LogSink) {
        self.write_output(&result.stderr, sink);
        self.write_output(&result.stdout, sink);

        let duration = self
            .last_start
            .map(|start| (now - start).to_std().unwrap_or(Duration::ZERO))
            .unwrap_or(Duration::ZERO);

        self.last_exit_code = result.code;
        self.last_result = result.success();
        if self.last_result {
            self.last_success = Some(now);
        }
        self.last_duration = duration;
        self.process = None;
        self.status = TaskStatus::Idle;

        info!(
            task = %self.name,
            exit_code = result.code,
            duration_secs = duration.as_secs_f64(),
            "task stopped"
        );
        sink.write(&format!(
            "{} Task stopped {}: with exit code: {}",
            timestamp(&now),
            self.name,
            result.code
        ));
    }

    fn write_output(&self, output: &CapturedOutput, sink: &dyn LogSink) {
        if output.dropped > 0 {
            debug!(task = %self.name, dropped = output.dropped, "output lines dropped");
            sink.write(&format!(
                "{}: ... {} earlier output lines dropped",
                self.name, output.dropped
            ));
        }
        for line in &output.lines {
            sink.write(&format!("{}: {}", self.name, line));
        }
    }
}

fn unix_seconds(t: &DateTime<Local>) -> f64 {
    t.timestamp_micros() as f64 / 1_000_000.0
}
