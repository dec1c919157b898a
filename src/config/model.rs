// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::schedule::DailyTime;

/// Top-level configuration exactly as read from the TOML file.
///
/// ```toml
/// http_port = 9100
/// logfile = "/var/log/anticron.log"
/// rtimer = 60
///
/// [[tasks]]
/// name = "backup"
/// command = "/usr/local/bin/backup.sh"
/// time_at = "03:30"
/// ```
///
/// Only `http_port` and `tasks` are required. Turn this into a
/// [`ConfigFile`] with `ConfigFile::try_from`, which runs validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// Port for the `/metrics` endpoint.
    pub http_port: u16,

    /// Lifecycle log file. `None` writes to stdout.
    #[serde(default)]
    pub logfile: Option<PathBuf>,

    /// Seconds to sleep between supervision passes.
    #[serde(default = "default_rtimer")]
    pub rtimer: u64,

    /// Shell used to run task commands as `<shell> -c <command>`.
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Lines of stdout/stderr kept per stream for each run.
    #[serde(default = "default_output_lines")]
    pub output_lines: usize,

    pub tasks: Vec<RawTaskConfig>,
}

/// One `[[tasks]]` entry before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTaskConfig {
    pub name: String,
    pub command: String,
    pub time_at: String,
}

pub fn default_rtimer() -> u64 {
    60
}

pub fn default_shell() -> String {
    "/bin/sh".to_string()
}

pub fn default_output_lines() -> usize {
    100
}

/// Validated configuration.
///
/// Construct via `ConfigFile::try_from(RawConfigFile)` (see `validate.rs`)
/// or [`crate::config::load_and_validate`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub http_port: u16,
    pub logfile: Option<PathBuf>,
    pub rtimer: u64,
    pub shell: String,
    pub output_lines: usize,
    /// Tasks in config order; names are unique.
    pub tasks: Vec<TaskConfig>,
}

/// A validated task definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskConfig {
    pub name: String,
    pub command: String,
    pub time_at: DailyTime,
}

impl ConfigFile {
    pub fn task(&self, name: &str) -> Option<&TaskConfig> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// The spawn options shared by every task.
    pub fn exec_options(&self) -> crate::exec::ExecOptions {
        crate::exec::ExecOptions {
            shell: self.shell.clone(),
            output_lines: self.output_lines,
        }
    }
}
