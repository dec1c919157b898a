#![allow(dead_code)]

use std::time::Duration;

use anticron::engine::Task;
use anticron::schedule::Scheduler;
use anticron::sink::LogSink;
use anticron::types::TaskStatus;

pub use anticron_test_utils::builders;
pub use anticron_test_utils::{RecordingSink, init_tracing, with_timeout};

/// Poll `task` every 10ms until a completion is observed.
pub async fn wait_for_completion(task: &mut Task, sink: &dyn LogSink) -> i32 {
    with_timeout(async {
        loop {
            if let Some(code) = task.poll(sink) {
                return code;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
}

/// Run `poll_all` every 10ms until `name` is idle again.
pub async fn wait_until_idle(scheduler: &mut Scheduler, name: &str) {
    with_timeout(async {
        loop {
            scheduler.poll_all();
            let idle = scheduler
                .task(name)
                .map(|t| t.status() == TaskStatus::Idle)
                .unwrap_or(true);
            if idle {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
}
