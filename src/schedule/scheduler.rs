// src/schedule/scheduler.rs

//! Owns the tasks and decides when each one is triggered.

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::engine::{Task, TriggerOutcome};
use crate::metrics::MetricsSink;
use crate::sink::LogSink;

/// A task plus the next instant it is due.
#[derive(Debug)]
struct Entry {
    task: Task,
    next_run: DateTime<Local>,
}

/// Fires each task at most once per day at its configured time of day.
///
/// Tasks keep their config order. All state changes happen on the caller's
/// thread inside [`Scheduler::tick`] and [`Scheduler::poll_all`].
pub struct Scheduler {
    entries: Vec<Entry>,
    sink: Box<dyn LogSink>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Schedule each task for the first occurrence of its time strictly
    /// after `now`.
    pub fn new(tasks: Vec<Task>, sink: Box<dyn LogSink>, now: DateTime<Local>) -> Self {
        let entries = tasks
            .into_iter()
            .map(|task| {
                let next_run = task.time_at().next_after(&now);
                debug!(task = %task.name(), %next_run, "task scheduled");
                Entry { task, next_run }
            })
            .collect();

        Self { entries, sink }
    }

    pub fn from_config(cfg: &ConfigFile, sink: Box<dyn LogSink>, now: DateTime<Local>) -> Self {
        let exec = cfg.exec_options();
        let tasks = cfg
            .tasks
            .iter()
            .map(|task_cfg| Task::new(task_cfg, exec.clone()))
            .collect();
        Self::new(tasks, sink, now)
    }

    /// Trigger every task whose next run is due at `now`, then move it to
    /// the next occurrence after `now`. Missed days are not caught up.
    ///
    /// Returns the names of the tasks that were triggered.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<String> {
        let mut fired = Vec::new();

        for entry in self.entries.iter_mut() {
            if entry.next_run > now {
                continue;
            }

            let outcome = entry.task.trigger_at(now, self.sink.as_ref());
            entry.next_run = entry.task.time_at().next_after(&now);

            info!(
                task = %entry.task.name(),
                outcome = outcome_label(&outcome),
                next_run = %entry.next_run,
                "scheduled trigger fired"
            );
            fired.push(entry.task.name().to_string());
        }

        fired
    }

    /// Poll every task for completion using the current time.
    pub fn poll_all(&mut self) {
        self.poll_all_at(Local::now());
    }

    pub fn poll_all_at(&mut self, now: DateTime<Local>) {
        for entry in self.entries.iter_mut() {
            entry.task.poll_at(now, self.sink.as_ref());
        }
    }

    /// Publish every task's gauges.
    pub fn publish(&self, metrics: &mut dyn MetricsSink) {
        for entry in &self.entries {
            entry.task.publish(metrics);
        }
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.entries.iter().map(|e| &e.task)
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks().find(|t| t.name() == name)
    }

    pub fn next_run(&self, name: &str) -> Option<DateTime<Local>> {
        self.entries
            .iter()
            .find(|e| e.task.name() == name)
            .map(|e| e.next_run)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn outcome_label(outcome: &TriggerOutcome) -> &'static str {
    match outcome {
        TriggerOutcome::Started => "started",
        TriggerOutcome::Stuck => "stuck",
        TriggerOutcome::SpawnFailed(_) => "spawn_failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    use crate::config::TaskConfig;
    use crate::exec::ExecOptions;
    use crate::schedule::DailyTime;

    struct Discard;

    impl LogSink for Discard {
        fn write(&self, _line: &str) {}
    }

    fn local(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, h, m, s).unwrap()
    }

    /// A task whose shell does not exist, so triggers never spawn anything.
    fn inert_task(name: &str, h: u32, m: u32) -> Task {
        let cfg = TaskConfig {
            name: name.to_string(),
            command: "true".to_string(),
            time_at: DailyTime::from_hm(h, m).unwrap(),
        };
        let exec = ExecOptions {
            shell: "/nonexistent/anticron-shell".to_string(),
            output_lines: 0,
        };
        Task::new(&cfg, exec)
    }

    #[test]
    fn first_run_is_next_occurrence_after_startup() {
        let s = Scheduler::new(
            vec![inert_task("later", 12, 0), inert_task("passed", 6, 0)],
            Box::new(Discard),
            local(8, 0, 0),
        );

        assert_eq!(s.next_run("later"), Some(local(12, 0, 0)));
        assert_eq!(s.next_run("passed"), Some(local(6, 0, 0) + TimeDelta::days(1)));
    }

    #[tokio::test]
    async fn fires_once_per_day_even_with_fine_ticks() {
        let mut s = Scheduler::new(vec![inert_task("t", 12, 0)], Box::new(Discard), local(11, 59, 0));

        assert!(s.tick(local(11, 59, 30)).is_empty());
        assert_eq!(s.tick(local(12, 0, 0)), vec!["t".to_string()]);
        assert!(s.tick(local(12, 0, 10)).is_empty());
        assert!(s.tick(local(12, 0, 59)).is_empty());
        assert_eq!(s.next_run("t"), Some(local(12, 0, 0) + TimeDelta::days(1)));
    }

    #[tokio::test]
    async fn coarse_ticks_still_fire_late_once() {
        let mut s = Scheduler::new(vec![inert_task("t", 12, 0)], Box::new(Discard), local(11, 0, 0));

        assert_eq!(s.tick(local(12, 0, 45)), vec!["t".to_string()]);
        assert!(s.tick(local(12, 1, 45)).is_empty());
    }

    #[tokio::test]
    async fn long_gap_does_not_replay_missed_days() {
        let mut s = Scheduler::new(vec![inert_task("t", 12, 0)], Box::new(Discard), local(11, 0, 0));

        let three_days_later = local(13, 0, 0) + TimeDelta::days(3);
        assert_eq!(s.tick(three_days_later).len(), 1);
        assert!(s.tick(three_days_later + TimeDelta::minutes(1)).is_empty());
        assert_eq!(s.next_run("t"), Some(local(12, 0, 0) + TimeDelta::days(4)));
    }
}
