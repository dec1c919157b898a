// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod metrics;
pub mod schedule;
pub mod sink;
pub mod types;

use std::path::Path;
use std::time::Duration;

use chrono::Local;
use tracing::info;

use crate::config::load_and_validate;
use crate::engine::Daemon;
use crate::errors::Result;
use crate::metrics::GaugeRegistry;
use crate::schedule::Scheduler;
use crate::sink::sink_from_config;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the lifecycle log sink
/// - the gauge registry and its HTTP exporter
/// - scheduler / daemon loop
/// - Ctrl-C handling
pub async fn run(config_path: &Path) -> Result<()> {
    let cfg = load_and_validate(config_path)?;

    let sink = sink_from_config(cfg.logfile.as_deref());
    let registry = GaugeRegistry::new();

    let listener = metrics::bind(cfg.http_port).await?;
    let _server = metrics::spawn_server(listener, registry.clone());

    let scheduler = Scheduler::from_config(&cfg, sink, Local::now());
    for task in scheduler.tasks() {
        info!(
            task = %task.name(),
            cmd = %task.command(),
            time_at = %task.time_at(),
            next_run = ?scheduler.next_run(task.name()),
            "task loaded"
        );
    }

    let daemon = Daemon::new(scheduler, registry, Duration::from_secs(cfg.rtimer));
    daemon.run().await;

    info!("anticron exiting");
    Ok(())
}
