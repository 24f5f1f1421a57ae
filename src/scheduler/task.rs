use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::event::EventError;

/// Opaque identifier for a scheduled task, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskHandle(Uuid);

impl TaskHandle {
    fn new() -> Self {
        TaskHandle(Uuid::new_v4())
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Work run on every firing of a repeating task
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    async fn run(&self) -> Result<(), EventError>;

    fn name(&self) -> &'static str;
}

/// Recurring timed callbacks, independent of the event bus
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Fires `job` every `period`, the first time one full period from now
    async fn schedule_repeating(&self, period: Duration, job: Arc<dyn ScheduledJob>)
        -> TaskHandle;

    /// Stops future firings of `handle`
    ///
    /// A firing that already started runs to completion. Returns false if the
    /// handle was unknown or already cancelled.
    async fn cancel(&self, handle: TaskHandle) -> bool;
}

struct TaskEntry {
    cancelled: Arc<AtomicBool>,
    wake: Arc<Notify>,
    _join: JoinHandle<()>,
}

impl TaskEntry {
    fn stop(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.wake.notify_one();
    }
}

/// Scheduler that runs each task on its own tokio task driven by an interval
#[derive(Default)]
pub struct TokioScheduler {
    tasks: Mutex<HashMap<TaskHandle, TaskEntry>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks that have not been cancelled
    pub async fn active_tasks(&self) -> usize {
        self.tasks.lock().await.len()
    }
}

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn schedule_repeating(
        &self,
        period: Duration,
        job: Arc<dyn ScheduledJob>,
    ) -> TaskHandle {
        let handle = TaskHandle::new();
        // tokio intervals reject a zero period
        let period = period.max(Duration::from_millis(1));
        let cancelled = Arc::new(AtomicBool::new(false));
        let wake = Arc::new(Notify::new());

        info!(
            task = %handle,
            job = job.name(),
            period_secs = period.as_secs(),
            "Scheduling repeating task"
        );

        let join = tokio::spawn(run_repeating(
            handle,
            period,
            job,
            cancelled.clone(),
            wake.clone(),
        ));

        self.tasks.lock().await.insert(
            handle,
            TaskEntry {
                cancelled,
                wake,
                _join: join,
            },
        );

        handle
    }

    async fn cancel(&self, handle: TaskHandle) -> bool {
        match self.tasks.lock().await.remove(&handle) {
            Some(entry) => {
                entry.stop();
                info!(task = %handle, "Cancelled repeating task");
                true
            }
            None => {
                debug!(task = %handle, "Cancel requested for unknown task");
                false
            }
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for entry in self.tasks.get_mut().values() {
            entry.stop();
        }
    }
}

async fn run_repeating(
    handle: TaskHandle,
    period: Duration,
    job: Arc<dyn ScheduledJob>,
    cancelled: Arc<AtomicBool>,
    wake: Arc<Notify>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = wake.notified() => {}
        }

        // Checked after every wake-up so nothing new starts once cancel returned
        if cancelled.load(Ordering::Acquire) {
            break;
        }

        debug!(task = %handle, job = job.name(), "Running scheduled job");

        match AssertUnwindSafe(job.run()).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(task = %handle, job = job.name(), error = %e, "Scheduled job failed");
            }
            Err(payload) => {
                let e = EventError::from_panic(payload);
                error!(task = %handle, job = job.name(), error = %e, "Scheduled job panicked");
            }
        }
    }

    info!(task = %handle, job = job.name(), "Repeating task stopped");
}
