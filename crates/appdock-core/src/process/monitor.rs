//! Background process-liveness polling.
//!
//! The platform offers no unified exit notification across all instance
//! kinds, so liveness is established by polling the process table. The
//! loop is an explicit tokio task with a watch-channel stop signal;
//! transient query errors are logged and retried on the next tick,
//! never surfaced to callers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::instances::InstanceManager;
use crate::process::operations as process_ops;

struct MonitorTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Polls tracked PIDs and drives exited instances to `Terminated`.
pub struct ProcessMonitor {
    manager: Arc<InstanceManager>,
    interval: Duration,
    task: Mutex<Option<MonitorTask>>,
}

impl ProcessMonitor {
    pub fn new(manager: Arc<InstanceManager>, interval: Duration) -> Self {
        Self {
            manager,
            interval,
            task: Mutex::new(None),
        }
    }

    /// Start the polling loop. Idempotent: a second start is a no-op.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&self) {
        let mut task = self.task.lock().expect("monitor task lock poisoned");
        if task.is_some() {
            debug!(event = "core.monitor.already_running");
            return;
        }

        info!(
            event = "core.monitor.started",
            interval_secs = self.interval.as_secs()
        );

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = self.manager.clone();
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        // Process-table queries block; keep them off the
                        // polling task so a slow tick never starves the
                        // shutdown signal.
                        let manager = manager.clone();
                        let result =
                            tokio::task::spawn_blocking(move || poll_once(&manager)).await;
                        if let Err(e) = result {
                            error!(event = "core.monitor.tick_panicked", error = %e);
                        }
                    }
                }
            }
            info!(event = "core.monitor.stopped");
        });

        *task = Some(MonitorTask {
            shutdown: shutdown_tx,
            handle,
        });
    }

    /// Stop the polling loop. No-op when never started. Leaves all
    /// instance records untouched.
    pub async fn stop(&self) {
        let task = {
            let mut slot = self.task.lock().expect("monitor task lock poisoned");
            slot.take()
        };
        let Some(task) = task else {
            debug!(event = "core.monitor.stop_not_running");
            return;
        };
        let _ = task.shutdown.send(true);
        let _ = task.handle.await;
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().expect("monitor task lock poisoned").is_some()
    }
}

/// One polling pass over every tracked PID.
///
/// Failures for one instance never abort the pass; each is logged and
/// the loop moves on.
fn poll_once(manager: &InstanceManager) {
    for (instance_id, pid, identity) in manager.tracked_pids() {
        match process_ops::is_process_running(pid) {
            Ok(true) => {
                // The pid is alive, but it may belong to a new process.
                if let Some(identity) = identity
                    && let Ok(info) = process_ops::get_process_info(pid)
                    && info.start_time != identity.start_time
                {
                    debug!(
                        event = "core.monitor.pid_reused",
                        instance_id = %instance_id,
                        pid = pid
                    );
                    mark_exited(manager, &instance_id, "process exited (pid reused)");
                }
            }
            Ok(false) => {
                info!(
                    event = "core.monitor.process_exited",
                    instance_id = %instance_id,
                    pid = pid
                );
                mark_exited(manager, &instance_id, "process exited");
            }
            Err(e) => {
                // Transient query error: retry on the next tick.
                warn!(
                    event = "core.monitor.poll_error",
                    instance_id = %instance_id,
                    pid = pid,
                    error = %e
                );
            }
        }
    }
}

fn mark_exited(manager: &InstanceManager, instance_id: &str, reason: &str) {
    if let Err(e) = manager.mark_exited(instance_id, reason, "process_monitor") {
        error!(
            event = "core.monitor.mark_exited_failed",
            instance_id = %instance_id,
            error = %e
        );
    }
}
