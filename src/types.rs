use std::fmt;

/// Observable lifecycle state of a task.
///
/// - `Idle`: no process owned; the next trigger may launch one.
/// - `Running`: a process was launched and has not been observed to exit.
/// - `Stuck`: still running, and a later trigger arrived before it exited.
///   Only the label changes; the process is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Idle,
    Running,
    Stuck,
}

impl TaskStatus {
    /// Numeric value exported on the `ac_task_status` gauge.
    pub fn gauge_value(self) -> f64 {
        match self {
            TaskStatus::Idle => 0.0,
            TaskStatus::Running => 1.0,
            TaskStatus::Stuck => 2.0,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Idle => "idle",
            TaskStatus::Running => "running",
            TaskStatus::Stuck => "stuck",
        };
        f.write_str(s)
    }
}
