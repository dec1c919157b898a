#![allow(dead_code)]

use anticron::config::{ConfigFile, RawConfigFile, RawTaskConfig, TaskConfig};
use anticron::config::model::{default_output_lines, default_rtimer, default_shell};
use anticron::engine::Task;
use anticron::exec::ExecOptions;
use anticron::schedule::DailyTime;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                http_port: 9100,
                logfile: None,
                rtimer: default_rtimer(),
                shell: default_shell(),
                output_lines: default_output_lines(),
                tasks: Vec::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, command: &str, time_at: &str) -> Self {
        self.config.tasks.push(RawTaskConfig {
            name: name.to_string(),
            command: command.to_string(),
            time_at: time_at.to_string(),
        });
        self
    }

    pub fn with_shell(mut self, shell: &str) -> Self {
        self.config.shell = shell.to_string();
        self
    }

    pub fn with_output_lines(mut self, lines: usize) -> Self {
        self.config.output_lines = lines;
        self
    }

    pub fn with_rtimer(mut self, secs: u64) -> Self {
        self.config.rtimer = secs;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a standalone `Task`.
pub struct TaskBuilder {
    name: String,
    command: String,
    time_at: DailyTime,
    exec: ExecOptions,
}

impl TaskBuilder {
    pub fn new(name: &str, command: &str) -> Self {
        Self {
            name: name.to_string(),
            command: command.to_string(),
            time_at: DailyTime::from_hm(3, 0).expect("valid time"),
            exec: ExecOptions::default(),
        }
    }

    pub fn at(mut self, hour: u32, minute: u32) -> Self {
        self.time_at = DailyTime::from_hm(hour, minute).expect("valid time");
        self
    }

    pub fn shell(mut self, shell: &str) -> Self {
        self.exec.shell = shell.to_string();
        self
    }

    pub fn output_lines(mut self, lines: usize) -> Self {
        self.exec.output_lines = lines;
        self
    }

    pub fn config(&self) -> TaskConfig {
        TaskConfig {
            name: self.name.clone(),
            command: self.command.clone(),
            time_at: self.time_at,
        }
    }

    pub fn build(self) -> Task {
        Task::new(&self.config(), self.exec)
    }
}
