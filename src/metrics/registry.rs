// src/metrics/registry.rs

//! Gauge definitions and the in-memory registry the exporter serves.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Arc, PoisonError, RwLock};

/// The six per-task gauges, all labelled by `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gauge {
    LastExitCode,
    TaskStatus,
    LastTaskResult,
    LastSuccessTimestamp,
    LastTaskDuration,
    LastTaskStartTimestamp,
}

impl Gauge {
    pub const ALL: [Gauge; 6] = [
        Gauge::LastExitCode,
        Gauge::TaskStatus,
        Gauge::LastTaskResult,
        Gauge::LastSuccessTimestamp,
        Gauge::LastTaskDuration,
        Gauge::LastTaskStartTimestamp,
    ];

    /// Exported metric name.
    pub fn metric_name(self) -> &'static str {
        match self {
            Gauge::LastExitCode => "ac_last_exit_code",
            Gauge::TaskStatus => "ac_task_status",
            Gauge::LastTaskResult => "ac_last_task_result",
            Gauge::LastSuccessTimestamp => "ac_last_success_timestamp",
            Gauge::LastTaskDuration => "ac_last_task_duration",
            Gauge::LastTaskStartTimestamp => "ac_last_task_start_timestamp",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Gauge::LastExitCode => "Last exit code for task",
            Gauge::TaskStatus => "Current task status",
            Gauge::LastTaskResult => "Last task execution result",
            Gauge::LastSuccessTimestamp => "Last success result timestamp",
            Gauge::LastTaskDuration => "Last task execution duration",
            Gauge::LastTaskStartTimestamp => "Last task start timestamp",
        }
    }
}

/// Where the supervision loop publishes gauge values.
pub trait MetricsSink {
    fn set(&mut self, gauge: Gauge, task: &str, value: f64);
}

type Series = BTreeMap<Gauge, BTreeMap<String, f64>>;

/// Shared gauge store.
///
/// Cloning is cheap; all clones see the same values. The daemon loop writes,
/// the HTTP exporter reads.
#[derive(Debug, Clone, Default)]
pub struct GaugeRegistry {
    inner: Arc<RwLock<Series>>,
}

impl GaugeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, gauge: Gauge, task: &str) -> Option<f64> {
        let series = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        series.get(&gauge).and_then(|by_task| by_task.get(task)).copied()
    }

    /// Render every gauge in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        let series = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut out = String::new();

        for gauge in Gauge::ALL {
            let name = gauge.metric_name();
            let _ = writeln!(out, "# HELP {name} {}", gauge.help());
            let _ = writeln!(out, "# TYPE {name} gauge");
            if let Some(by_task) = series.get(&gauge) {
                for (task, value) in by_task {
                    let _ = writeln!(
                        out,
                        "{name}{{name=\"{}\"}} {}",
                        escape_label(task),
                        format_value(*value)
                    );
                }
            }
        }

        out
    }
}

impl MetricsSink for GaugeRegistry {
    fn set(&mut self, gauge: Gauge, task: &str, value: f64) {
        let mut series = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        series
            .entry(gauge)
            .or_default()
            .insert(task.to_string(), value);
    }
}

fn escape_label(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else {
        value.to_string()
    }
}
