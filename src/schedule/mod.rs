// src/schedule/mod.rs

//! Daily scheduling.
//!
//! - [`daily`] parses `HH:MM` times and computes the next occurrence.
//! - [`scheduler`] owns the tasks and fires each one once per day.

pub mod daily;
pub mod scheduler;

pub use daily::{DailyTime, next_occurrence};
pub use scheduler::Scheduler;
