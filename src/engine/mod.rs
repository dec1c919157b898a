// src/engine/mod.rs

//! Task supervision.
//!
//! - [`task`] holds the per-task lifecycle state machine
//!   (idle → running → idle, with stuck while an overrun is detected).
//! - [`daemon`] drives the scheduler, the gauges and the sleep interval.

pub mod daemon;
pub mod task;

pub use daemon::Daemon;
pub use task::{Task, TaskMetrics, TriggerOutcome};
