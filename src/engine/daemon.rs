// src/engine/daemon.rs

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::metrics::GaugeRegistry;
use crate::schedule::Scheduler;

/// Top-level supervision loop.
///
/// Each pass polls every task, publishes the gauges, fires due triggers
/// and then sleeps for `interval`. The sleep is the only point where the
/// loop waits.
#[derive(Debug)]
pub struct Daemon {
    scheduler: Scheduler,
    registry: GaugeRegistry,
    interval: Duration,
}

impl Daemon {
    pub fn new(scheduler: Scheduler, registry: GaugeRegistry, interval: Duration) -> Self {
        Self {
            scheduler,
            registry,
            interval,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn registry(&self) -> &GaugeRegistry {
        &self.registry
    }

    /// One supervision pass at `now`. Returns the tasks triggered.
    pub fn run_once_at(&mut self, now: DateTime<Local>) -> Vec<String> {
        self.scheduler.poll_all_at(now);
        self.scheduler.publish(&mut self.registry);
        self.scheduler.tick(now)
    }

    /// Run until Ctrl-C.
    pub async fn run(self) {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C; running until killed");
                std::future::pending::<()>().await;
            }
        };
        self.run_until(shutdown).await;
    }

    /// Run until `shutdown` resolves.
    pub async fn run_until<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            tasks = self.scheduler.len(),
            interval_secs = self.interval.as_secs_f64(),
            "anticron daemon started"
        );
        tokio::pin!(shutdown);

        loop {
            let fired = self.run_once_at(Local::now());
            if !fired.is_empty() {
                debug!(?fired, "tasks triggered this pass");
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    info!("shutdown requested; leaving running tasks alone");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Timelike};

    use crate::config::TaskConfig;
    use crate::engine::Task;
    use crate::exec::ExecOptions;
    use crate::metrics::Gauge;
    use crate::schedule::DailyTime;
    use crate::sink::LogSink;

    struct Discard;

    impl LogSink for Discard {
        fn write(&self, _line: &str) {}
    }

    fn daemon_with(command: &str, now: DateTime<Local>) -> Daemon {
        let at = now + TimeDelta::minutes(1);
        let cfg = TaskConfig {
            name: "job".to_string(),
            command: command.to_string(),
            time_at: DailyTime::from_hm(at.hour(), at.minute()).unwrap(),
        };
        let task = Task::new(&cfg, ExecOptions::default());
        let scheduler = Scheduler::new(vec![task], Box::new(Discard), now);
        Daemon::new(scheduler, GaugeRegistry::new(), Duration::from_millis(10))
    }

    #[tokio::test]
    async fn pass_publishes_before_triggering() {
        let now = Local::now();
        let mut daemon = daemon_with("sleep 5", now);
        let due = daemon.scheduler().next_run("job").unwrap();

        let fired = daemon.run_once_at(due);
        assert_eq!(fired, vec!["job".to_string()]);
        // Gauges reflect the state before this pass's trigger.
        assert_eq!(daemon.registry().get(Gauge::TaskStatus, "job"), Some(0.0));

        daemon.run_once_at(due + TimeDelta::seconds(1));
        assert_eq!(daemon.registry().get(Gauge::TaskStatus, "job"), Some(1.0));
    }

    #[tokio::test]
    async fn run_until_stops_on_shutdown() {
        let daemon = daemon_with("true", Local::now());
        let registry = daemon.registry().clone();

        tokio::time::timeout(
            Duration::from_secs(5),
            daemon.run_until(tokio::time::sleep(Duration::from_millis(50))),
        )
        .await
        .expect("daemon should stop");

        assert_eq!(registry.get(Gauge::TaskStatus, "job"), Some(0.0));
    }
}
