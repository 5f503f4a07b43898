//! Lifecycle orchestrator: the facade composing launchers, the window
//! manager, the instance registry, and the polling loops.
//!
//! Error policy at this boundary: argument validation fails before any
//! side effect; launcher errors and panics are converted into failed
//! [`LaunchResult`]s; correlation failure degrades to a placeholder
//! window; unknown instance ids yield `Ok(false)` from switch and
//! terminate operations, never an error.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::audit::AuditSink;
use crate::catalog::{ApplicationDescriptor, ApplicationKind};
use crate::config::AppdockConfig;
use crate::errors::OrchestratorError;
use crate::events::InstanceEvent;
use crate::instances::types::{ApplicationInstance, InstanceWindow};
use crate::instances::InstanceManager;
use crate::launchers::types::{LaunchResult, LauncherWindowEvent, LauncherWindowEventKind};
use crate::launchers::LauncherRegistry;
use crate::process::ProcessMonitor;
use crate::windows::provider::{SystemWindowProvider, WindowProvider};
use crate::windows::WindowManager;

/// Metadata key carrying the Android package name on an instance.
const PACKAGE_KEY: &str = "package";

struct WindowLivenessTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct Orchestrator {
    launchers: LauncherRegistry,
    window_manager: Arc<WindowManager>,
    instances: Arc<InstanceManager>,
    monitor: ProcessMonitor,
    frame_class: String,
    window_poll_interval: Duration,
    window_task: Mutex<Option<WindowLivenessTask>>,
}

impl Orchestrator {
    /// Compose an orchestrator from explicit parts.
    ///
    /// Spawns the audit forwarder and any launcher window-event
    /// forwarders, so this must be called within a tokio runtime.
    pub fn new(
        config: &AppdockConfig,
        launchers: LauncherRegistry,
        provider: Arc<dyn WindowProvider>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let window_manager = Arc::new(WindowManager::new(provider, &config.correlation));
        let instances = Arc::new(InstanceManager::new(
            window_manager.clone(),
            &config.instances,
        ));
        let monitor = ProcessMonitor::new(
            instances.clone(),
            Duration::from_secs(config.monitor.poll_interval_secs),
        );

        tokio::spawn(forward_audit(instances.subscribe(), audit));
        for source in launchers.window_event_sources() {
            tokio::spawn(forward_launcher_events(source.subscribe(), instances.clone()));
        }

        Self {
            launchers,
            window_manager,
            instances,
            monitor,
            frame_class: config.android.frame_class.clone(),
            window_poll_interval: Duration::from_secs(config.monitor.window_poll_interval_secs),
            window_task: Mutex::new(None),
        }
    }

    /// Orchestrator with the stock backends, the real OS window list,
    /// and a log-backed audit sink.
    pub fn with_defaults(config: &AppdockConfig) -> Self {
        Self::new(
            config,
            LauncherRegistry::from_config(config),
            Arc::new(SystemWindowProvider::new()),
            Arc::new(crate::audit::LogAuditSink),
        )
    }

    /// Subscribe to the instance event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<InstanceEvent> {
        self.instances.subscribe()
    }

    /// Launch the application described by `descriptor` on behalf of
    /// `principal`.
    ///
    /// Validation failures are errors; everything after validation is
    /// reported through the returned [`LaunchResult`]. A launcher panic
    /// or error never escapes this method.
    pub fn launch(
        &self,
        descriptor: &ApplicationDescriptor,
        principal: &str,
    ) -> Result<LaunchResult, OrchestratorError> {
        if principal.trim().is_empty() {
            return Err(OrchestratorError::empty_argument("principal"));
        }
        descriptor
            .validate()
            .map_err(|e| OrchestratorError::ArgumentInvalid {
                name: "descriptor".to_string(),
                message: e.to_string(),
            })?;

        let start = Instant::now();

        let backend = match self.launchers.find(descriptor) {
            Ok(backend) => backend,
            Err(e) => {
                warn!(
                    event = "core.orchestrator.no_launcher",
                    app_id = %descriptor.id,
                    kind = descriptor.kind.as_str()
                );
                return Ok(LaunchResult::failed(e.to_string(), start.elapsed()));
            }
        };

        let outcome =
            std::panic::catch_unwind(AssertUnwindSafe(|| backend.launch(descriptor, principal)));
        let launched = match outcome {
            Ok(Ok(launched)) => launched,
            Ok(Err(e)) => {
                info!(
                    event = "core.orchestrator.launch_failed",
                    app_id = %descriptor.id,
                    error = %e
                );
                return Ok(LaunchResult::failed(e.to_string(), start.elapsed()));
            }
            Err(payload) => {
                let message = panic_message(payload);
                error!(
                    event = "core.orchestrator.launcher_panicked",
                    app_id = %descriptor.id,
                    message = %message
                );
                return Ok(LaunchResult::failed(
                    format!("launcher panicked: {}", message),
                    start.elapsed(),
                ));
            }
        };
        // Correlation windows are anchored at the moment the launch
        // call returned.
        let launch_time = Utc::now();

        let mut instance = ApplicationInstance::new(descriptor.clone(), principal.to_string());
        instance.pid = launched.pid;
        instance.process = launched.process;
        instance.metadata.extend(launched.metadata);
        let instance_id = instance.id.clone();
        let pid = instance.pid;

        let window = self.resolve_window(&instance_id, descriptor, pid, launch_time);

        if let Err(e) = self.instances.register(instance) {
            error!(
                event = "core.orchestrator.register_failed",
                app_id = %descriptor.id,
                error = %e
            );
            return Ok(LaunchResult::failed(e.to_string(), start.elapsed()));
        }
        if let Some(window) = window {
            let _ = self.instances.set_window(&instance_id, window);
        }
        if let Err(e) = self.instances.mark_running(&instance_id) {
            error!(
                event = "core.orchestrator.mark_running_failed",
                instance_id = %instance_id,
                error = %e
            );
        }

        info!(
            event = "core.orchestrator.launch_completed",
            app_id = %descriptor.id,
            instance_id = %instance_id,
            pid = pid,
            elapsed_ms = start.elapsed().as_millis() as u64
        );
        Ok(LaunchResult::succeeded(instance_id, pid, start.elapsed()))
    }

    /// Window association for a fresh launch, per descriptor kind.
    ///
    /// Ambiguous-origin kinds run the correlation heuristic and degrade
    /// to a placeholder on failure; deterministic kinds look up by pid
    /// best-effort and simply have no window when none is found yet.
    fn resolve_window(
        &self,
        instance_id: &str,
        descriptor: &ApplicationDescriptor,
        pid: u32,
        launch_time: chrono::DateTime<Utc>,
    ) -> Option<InstanceWindow> {
        match descriptor.kind {
            ApplicationKind::AndroidPackage => {
                let correlated = self.window_manager.correlate_ambiguous(
                    instance_id,
                    &self.frame_class,
                    &descriptor.display_name,
                    launch_time,
                );
                match correlated {
                    Ok(Some(info)) => Some(InstanceWindow::real(info.handle, info.title)),
                    Ok(None) => {
                        warn!(
                            event = "core.orchestrator.correlation_degraded",
                            instance_id = %instance_id,
                            app_id = %descriptor.id
                        );
                        Some(InstanceWindow::placeholder(&descriptor.display_name))
                    }
                    Err(e) => {
                        warn!(
                            event = "core.orchestrator.correlation_error",
                            instance_id = %instance_id,
                            error = %e
                        );
                        Some(InstanceWindow::placeholder(&descriptor.display_name))
                    }
                }
            }
            ApplicationKind::NativeProcess | ApplicationKind::BrowserApp if pid > 0 => {
                match self.window_manager.find_by_pid(pid) {
                    Ok(Some(info)) => Some(InstanceWindow::real(info.handle, info.title)),
                    Ok(None) => None,
                    Err(e) => {
                        debug!(
                            event = "core.orchestrator.window_lookup_failed",
                            pid = pid,
                            error = %e
                        );
                        None
                    }
                }
            }
            _ => None,
        }
    }

    /// Bring an instance to the foreground.
    ///
    /// Prefers a real window via the window manager; a placeholder
    /// Android instance falls back to re-invoking the launch activity.
    /// Unknown ids yield `Ok(false)`.
    pub fn switch_to(&self, id: &str) -> Result<bool, OrchestratorError> {
        if id.trim().is_empty() {
            return Err(OrchestratorError::empty_argument("instance_id"));
        }
        let Some(instance) = self.instances.get(id) else {
            return Ok(false);
        };
        if instance.state.is_terminal() {
            return Ok(false);
        }

        match self.instances.activate(id) {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(e) => {
                error!(event = "core.orchestrator.activate_failed", instance_id = id, error = %e);
                return Ok(false);
            }
        }

        if instance.descriptor.kind != ApplicationKind::AndroidPackage
            || instance.has_real_window()
        {
            return Ok(false);
        }

        // Placeholder instance: re-invoking the launcher activity is the
        // only way to surface it. Slower than a true window switch.
        info!(
            event = "core.orchestrator.switch_relaunch_fallback",
            instance_id = id,
            app_id = %instance.descriptor.id
        );
        let backend = match self.launchers.find(&instance.descriptor) {
            Ok(backend) => backend,
            Err(e) => {
                warn!(event = "core.orchestrator.switch_no_launcher", error = %e);
                return Ok(false);
            }
        };
        if let Err(e) = backend.launch(&instance.descriptor, &instance.principal) {
            warn!(
                event = "core.orchestrator.switch_relaunch_failed",
                instance_id = id,
                error = %e
            );
            return Ok(false);
        }
        match self.instances.mark_active(id, Some("re-launched activity")) {
            Ok(activated) => Ok(activated),
            Err(e) => {
                error!(event = "core.orchestrator.mark_active_failed", instance_id = id, error = %e);
                Ok(false)
            }
        }
    }

    /// Graceful termination. Unknown ids yield `Ok(false)`; terminating
    /// an already-terminal instance is `Ok(true)`.
    pub fn terminate(&self, id: &str) -> Result<bool, OrchestratorError> {
        if id.trim().is_empty() {
            return Err(OrchestratorError::empty_argument("instance_id"));
        }
        match self.instances.terminate(id) {
            Ok(result) => Ok(result),
            Err(e) => {
                error!(event = "core.orchestrator.terminate_failed", instance_id = id, error = %e);
                Ok(false)
            }
        }
    }

    /// Forced termination, for instances that survived `terminate`.
    pub fn force_terminate(&self, id: &str) -> Result<bool, OrchestratorError> {
        if id.trim().is_empty() {
            return Err(OrchestratorError::empty_argument("instance_id"));
        }
        match self.instances.force_terminate(id) {
            Ok(result) => Ok(result),
            Err(e) => {
                error!(
                    event = "core.orchestrator.force_terminate_failed",
                    instance_id = id,
                    error = %e
                );
                Ok(false)
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<ApplicationInstance> {
        self.instances.get(id)
    }

    pub fn get_all(&self) -> Vec<ApplicationInstance> {
        self.instances.get_all()
    }

    /// Re-insert a persisted instance record. See
    /// [`InstanceManager::restore`].
    pub fn restore(&self, instance: ApplicationInstance) -> Result<(), crate::instances::InstanceError> {
        self.instances.restore(instance)
    }

    pub fn get_running(&self) -> Vec<ApplicationInstance> {
        self.instances.get_running()
    }

    pub fn get_running_for_user(&self, principal: &str) -> Vec<ApplicationInstance> {
        self.instances.get_running_for_user(principal)
    }

    /// Reap terminal instances past the retention period.
    pub fn cleanup(&self) -> usize {
        self.instances.cleanup()
    }

    /// Start the process poll and the window-liveness poll. Idempotent.
    pub fn start_monitoring(&self) {
        self.monitor.start();

        let mut task = self.window_task.lock().expect("window task lock poisoned");
        if task.is_some() {
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let instances = self.instances.clone();
        let window_manager = self.window_manager.clone();
        let interval = self.window_poll_interval;

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
                        let instances = instances.clone();
                        let window_manager = window_manager.clone();
                        let result = tokio::task::spawn_blocking(move || {
                            window_poll_once(&instances, &window_manager)
                        })
                        .await;
                        if let Err(e) = result {
                            error!(event = "core.orchestrator.window_tick_panicked", error = %e);
                        }
                    }
                }
            }
            info!(event = "core.orchestrator.window_poll_stopped");
        });

        *task = Some(WindowLivenessTask {
            shutdown: shutdown_tx,
            handle,
        });
        info!(
            event = "core.orchestrator.monitoring_started",
            window_poll_secs = interval.as_secs()
        );
    }

    /// Stop both polling loops. Completes promptly and leaves all
    /// instance records untouched.
    pub async fn stop_monitoring(&self) -> Result<(), OrchestratorError> {
        let task = {
            let mut slot = self.window_task.lock().expect("window task lock poisoned");
            slot.take()
        };
        let was_running = self.monitor.is_running() || task.is_some();

        self.monitor.stop().await;
        if let Some(task) = task {
            let _ = task.shutdown.send(true);
            let _ = task.handle.await;
        }

        if was_running {
            info!(event = "core.orchestrator.monitoring_stopped");
            Ok(())
        } else {
            Err(OrchestratorError::MonitoringNotRunning)
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_running()
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// One window-liveness pass over correlated ambiguous-origin instances.
fn window_poll_once(instances: &InstanceManager, window_manager: &WindowManager) {
    let tracked = instances.correlated_ambiguous();
    if tracked.is_empty() {
        return;
    }

    let live: HashSet<u32> = match window_manager.snapshot() {
        Ok(windows) => windows.iter().map(|w| w.handle.as_u32()).collect(),
        Err(e) => {
            // Transient enumeration error: retry next tick.
            warn!(event = "core.orchestrator.window_poll_error", error = %e);
            return;
        }
    };

    for (instance_id, handle) in tracked {
        if !live.contains(&handle.as_u32()) {
            info!(
                event = "core.orchestrator.window_gone",
                instance_id = %instance_id,
                handle = handle.as_u32()
            );
            if let Err(e) = instances.mark_window_gone(&instance_id) {
                error!(
                    event = "core.orchestrator.mark_window_gone_failed",
                    instance_id = %instance_id,
                    error = %e
                );
            }
        }
    }
}

/// Forward every instance event to the audit sink.
async fn forward_audit(
    mut events: broadcast::Receiver<InstanceEvent>,
    audit: Arc<dyn AuditSink>,
) {
    loop {
        match events.recv().await {
            Ok(event) => audit.record(&event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(event = "core.orchestrator.audit_lagged", skipped = skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Feed launcher-observed window events into the state machine.
async fn forward_launcher_events(
    mut events: broadcast::Receiver<LauncherWindowEvent>,
    instances: Arc<InstanceManager>,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(event = "core.orchestrator.launcher_events_lagged", skipped = skipped);
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        let matching: Vec<String> = instances
            .get_running()
            .into_iter()
            .filter(|i| {
                i.descriptor.kind == ApplicationKind::AndroidPackage
                    && i.metadata.get(PACKAGE_KEY).map(String::as_str)
                        == Some(event.target.as_str())
            })
            .map(|i| i.id)
            .collect();

        for id in matching {
            let result = match event.kind {
                LauncherWindowEventKind::Activated => instances
                    .mark_active(&id, Some("subsystem window activated"))
                    .map(|_| ()),
                LauncherWindowEventKind::Closed => instances.mark_window_gone(&id),
            };
            if let Err(e) = result {
                warn!(
                    event = "core.orchestrator.launcher_event_apply_failed",
                    instance_id = %id,
                    error = %e
                );
            }
        }
    }
}
