// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile, RawTaskConfig, TaskConfig};
use crate::errors::{AnticronError, Result};
use crate::schedule::DailyTime;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = AnticronError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_global_config(&raw)?;
        let tasks = validate_tasks(&raw.tasks)?;

        Ok(ConfigFile {
            http_port: raw.http_port,
            logfile: raw.logfile,
            rtimer: raw.rtimer,
            shell: raw.shell,
            output_lines: raw.output_lines,
            tasks,
        })
    }
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.http_port == 0 {
        return Err(AnticronError::ConfigError(
            "http_port must be a non-zero port number".to_string(),
        ));
    }

    if cfg.rtimer == 0 {
        return Err(AnticronError::ConfigError(
            "rtimer must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.shell.trim().is_empty() {
        return Err(AnticronError::ConfigError(
            "shell must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_tasks(raw: &[RawTaskConfig]) -> Result<Vec<TaskConfig>> {
    if raw.is_empty() {
        return Err(AnticronError::ConfigError(
            "config must contain at least one [[tasks]] entry".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(raw.len());

    for task in raw {
        let name = task.name.trim();
        if name.is_empty() {
            return Err(AnticronError::ConfigError(
                "every task needs a non-empty `name`".to_string(),
            ));
        }
        if !seen.insert(name.to_string()) {
            return Err(AnticronError::ConfigError(format!(
                "duplicate task name '{}'",
                name
            )));
        }
        if task.command.trim().is_empty() {
            return Err(AnticronError::ConfigError(format!(
                "task '{}' has an empty `command`",
                name
            )));
        }

        let time_at =
            DailyTime::parse(&task.time_at).ok_or_else(|| AnticronError::InvalidTime {
                task: name.to_string(),
                value: task.time_at.clone(),
            })?;

        tasks.push(TaskConfig {
            name: name.to_string(),
            command: task.command.clone(),
            time_at,
        });
    }

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{default_output_lines, default_shell};

    fn raw(tasks: Vec<RawTaskConfig>) -> RawConfigFile {
        RawConfigFile {
            http_port: 9100,
            logfile: None,
            rtimer: 60,
            shell: default_shell(),
            output_lines: default_output_lines(),
            tasks,
        }
    }

    fn task(name: &str, time_at: &str) -> RawTaskConfig {
        RawTaskConfig {
            name: name.to_string(),
            command: "true".to_string(),
            time_at: time_at.to_string(),
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = ConfigFile::try_from(raw(vec![task("a", "01:00"), task("a", "02:00")]))
            .unwrap_err();
        assert!(matches!(err, AnticronError::ConfigError(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn bad_time_is_a_typed_error() {
        let err = ConfigFile::try_from(raw(vec![task("a", "25:00")])).unwrap_err();
        match err {
            AnticronError::InvalidTime { task, value } => {
                assert_eq!(task, "a");
                assert_eq!(value, "25:00");
            }
            other => panic!("expected InvalidTime, got {other:?}"),
        }
    }

    #[test]
    fn empty_task_list_is_rejected() {
        assert!(ConfigFile::try_from(raw(vec![])).is_err());
    }

    #[test]
    fn zero_rtimer_is_rejected() {
        let mut cfg = raw(vec![task("a", "01:00")]);
        cfg.rtimer = 0;
        assert!(matches!(
            ConfigFile::try_from(cfg),
            Err(AnticronError::ConfigError(_))
        ));
    }

    #[test]
    fn valid_config_keeps_task_order() {
        let cfg = ConfigFile::try_from(raw(vec![task("b", "01:00"), task("a", "02:30")]))
            .expect("valid config");
        let names: Vec<_> = cfg.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(cfg.task("a").map(|t| t.time_at.to_string()), Some("02:30".to_string()));
    }
}
