//! The authoritative registry of running application instances.
//!
//! The registry is the single source of truth: every mutation goes
//! through manager operations so the state machine invariant holds.
//! Reads hand out snapshots; writes are serialized behind one mutex.
//! Events are sent while the lock is held, which keeps per-instance
//! event order identical to the order the state actually changed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::config::InstancesConfig;
use crate::events::{InstanceEvent, InstanceEventKind, event_kind_for_transition};
use crate::instances::errors::InstanceError;
use crate::instances::types::{ApplicationInstance, InstanceState, InstanceWindow};
use crate::process::{ProcessMetadata, operations as process_ops};
use crate::windows::WindowManager;
use crate::catalog::ApplicationKind;

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct InstanceManager {
    registry: Mutex<HashMap<String, ApplicationInstance>>,
    events: broadcast::Sender<InstanceEvent>,
    window_manager: Arc<WindowManager>,
    graceful_timeout: Duration,
    retention_secs: i64,
}

impl InstanceManager {
    pub fn new(window_manager: Arc<WindowManager>, config: &InstancesConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            registry: Mutex::new(HashMap::new()),
            events,
            window_manager,
            graceful_timeout: Duration::from_secs(config.graceful_timeout_secs),
            retention_secs: config.retention_secs,
        }
    }

    /// Subscribe to the instance event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<InstanceEvent> {
        self.events.subscribe()
    }

    /// Add a new instance to the registry.
    ///
    /// The instance must be in `Starting`; a colliding id fails with
    /// `DuplicateInstance`. Emits a `Started` event.
    pub fn register(&self, instance: ApplicationInstance) -> Result<(), InstanceError> {
        if instance.state != InstanceState::Starting {
            return Err(InstanceError::NotStarting {
                id: instance.id.clone(),
                state: instance.state,
            });
        }

        let mut registry = self.lock_registry();
        if registry.contains_key(&instance.id) {
            return Err(InstanceError::DuplicateInstance {
                id: instance.id.clone(),
            });
        }

        info!(
            event = "core.instance.registered",
            instance_id = %instance.id,
            app_id = %instance.descriptor.id,
            principal = %instance.principal
        );

        let event = InstanceEvent::new(
            InstanceEventKind::Started,
            instance.clone(),
            None,
            Some(InstanceState::Starting),
        );
        registry.insert(instance.id.clone(), instance);
        let _ = self.events.send(event);
        Ok(())
    }

    /// Re-insert a previously persisted instance without emitting an
    /// event. Accepts any state; the next polling pass reconciles
    /// liveness.
    pub fn restore(&self, instance: ApplicationInstance) -> Result<(), InstanceError> {
        let mut registry = self.lock_registry();
        if registry.contains_key(&instance.id) {
            return Err(InstanceError::DuplicateInstance {
                id: instance.id.clone(),
            });
        }
        debug!(
            event = "core.instance.restored",
            instance_id = %instance.id,
            state = instance.state.as_str()
        );
        registry.insert(instance.id.clone(), instance);
        Ok(())
    }

    /// Record the launch outcome on a registered instance.
    pub fn set_process(
        &self,
        id: &str,
        pid: u32,
        process: Option<ProcessMetadata>,
    ) -> Result<(), InstanceError> {
        let mut registry = self.lock_registry();
        let instance = registry
            .get_mut(id)
            .ok_or_else(|| InstanceError::NotFound { id: id.to_string() })?;
        instance.pid = pid;
        instance.process = process;
        instance.updated_at = Utc::now();
        Ok(())
    }

    /// Associate a window with an instance.
    ///
    /// A real handle is never silently replaced by a placeholder; the
    /// placeholder is dropped and the real association kept.
    pub fn set_window(&self, id: &str, window: InstanceWindow) -> Result<(), InstanceError> {
        let mut registry = self.lock_registry();
        let instance = registry
            .get_mut(id)
            .ok_or_else(|| InstanceError::NotFound { id: id.to_string() })?;

        if instance.has_real_window() && window.is_placeholder() {
            debug!(
                event = "core.instance.placeholder_rejected",
                instance_id = id
            );
            return Ok(());
        }

        instance.window = Some(window);
        instance.updated_at = Utc::now();
        Ok(())
    }

    /// Transition `Starting -> Running` after a successful launch.
    pub fn mark_running(&self, id: &str) -> Result<(), InstanceError> {
        let mut registry = self.lock_registry();
        self.transition_locked(&mut registry, id, InstanceState::Running, None, None)
    }

    /// Drive an instance to `Terminated` from outside (process exit,
    /// window closed). Idempotent: already-terminal instances are left
    /// untouched.
    pub fn mark_exited(&self, id: &str, reason: &str, source: &str) -> Result<(), InstanceError> {
        let mut registry = self.lock_registry();
        let Some(instance) = registry.get(id) else {
            return Err(InstanceError::NotFound { id: id.to_string() });
        };
        if instance.state.is_terminal() {
            return Ok(());
        }
        self.transition_locked(
            &mut registry,
            id,
            InstanceState::Terminated,
            Some(reason),
            Some(source),
        )
    }

    /// Record that an instance's correlated window disappeared. For
    /// window-only instances this is the end of the lifecycle.
    pub fn mark_window_gone(&self, id: &str) -> Result<(), InstanceError> {
        self.mark_exited(id, "window closed", "window_monitor")
    }

    /// Drive an instance to the `Error` sink.
    pub fn mark_error(&self, id: &str, reason: &str) -> Result<(), InstanceError> {
        let mut registry = self.lock_registry();
        let Some(instance) = registry.get(id) else {
            return Err(InstanceError::NotFound { id: id.to_string() });
        };
        if instance.state.is_terminal() {
            return Ok(());
        }
        self.transition_locked(&mut registry, id, InstanceState::Error, Some(reason), None)
    }

    /// Bring an instance's window to the foreground.
    ///
    /// Requires the window manager to confirm the window can be
    /// activated. On success the instance becomes `Active` and any
    /// other `Active` instance of the same principal is demoted to
    /// `Inactive`. On failure returns `Ok(false)` with no state change.
    pub fn activate(&self, id: &str) -> Result<bool, InstanceError> {
        let handle = {
            let registry = self.lock_registry();
            let Some(instance) = registry.get(id) else {
                return Ok(false);
            };
            if instance.state.is_terminal() {
                return Ok(false);
            }
            if !instance.has_real_window() {
                return Ok(false);
            }
            instance.window.as_ref().map(|w| w.handle)
        };
        let Some(handle) = handle else {
            return Ok(false);
        };

        // OS call runs outside the registry lock.
        if let Err(e) = self.window_manager.activate(handle) {
            warn!(
                event = "core.instance.activate_window_failed",
                instance_id = id,
                error = %e
            );
            return Ok(false);
        }

        self.mark_active(id, None)
    }

    /// Promote an instance to `Active` without a window confirmation.
    ///
    /// Used for the re-launch fallback of placeholder instances, where
    /// there is no real handle for the window manager to act on. Same
    /// sibling-demotion semantics as [`Self::activate`].
    pub fn mark_active(&self, id: &str, reason: Option<&str>) -> Result<bool, InstanceError> {
        let mut registry = self.lock_registry();
        let Some(instance) = registry.get(id) else {
            return Ok(false);
        };
        if instance.state == InstanceState::Active {
            return Ok(true);
        }
        if !instance.state.can_transition_to(InstanceState::Active) {
            return Ok(false);
        }
        let principal = instance.principal.clone();

        let sibling_ids: Vec<String> = registry
            .values()
            .filter(|i| {
                i.id != id && i.principal == principal && i.state == InstanceState::Active
            })
            .map(|i| i.id.clone())
            .collect();
        for sibling_id in sibling_ids {
            let _ = self.transition_locked(
                &mut registry,
                &sibling_id,
                InstanceState::Inactive,
                Some("another instance activated"),
                None,
            );
        }

        self.transition_locked(&mut registry, id, InstanceState::Active, reason, None)?;
        Ok(true)
    }

    /// Graceful termination with a bounded wait.
    ///
    /// Idempotent: terminating an already-terminal instance returns
    /// `Ok(true)`. Never escalates to a forced kill — if the process
    /// survives the wait the instance is marked `NotResponding` and the
    /// call returns `Ok(false)`.
    pub fn terminate(&self, id: &str) -> Result<bool, InstanceError> {
        let Some(target) = self.termination_target(id) else {
            return Ok(false);
        };
        if target.already_terminal {
            return Ok(true);
        }

        info!(event = "core.instance.terminate_started", instance_id = id);

        if target.pid == 0 {
            // Nothing to signal; close a real window best-effort and
            // mark the instance done.
            if let Some(handle) = target.real_window {
                if let Err(e) = self.window_manager.close(handle) {
                    debug!(
                        event = "core.instance.terminate_close_failed",
                        instance_id = id,
                        error = %e
                    );
                }
            }
            self.mark_exited(id, "terminated by request", "instance_manager")?;
            return Ok(true);
        }

        let result = process_ops::terminate_process(
            target.pid,
            target.process.as_ref().map(|p| p.name.as_str()),
            target.process.as_ref().map(|p| p.start_time),
            self.graceful_timeout,
        );

        match result {
            Ok(true) => {
                self.mark_exited(id, "terminated by request", "instance_manager")?;
                Ok(true)
            }
            Ok(false) => {
                let mut registry = self.lock_registry();
                let _ = self.transition_locked(
                    &mut registry,
                    id,
                    InstanceState::NotResponding,
                    Some("survived graceful termination"),
                    Some("instance_manager"),
                );
                Ok(false)
            }
            Err(crate::process::ProcessError::NotFound { .. })
            | Err(crate::process::ProcessError::PidReused { .. }) => {
                // Our process is already gone.
                self.mark_exited(id, "process already exited", "instance_manager")?;
                Ok(true)
            }
            Err(e) => {
                error!(
                    event = "core.instance.terminate_failed",
                    instance_id = id,
                    error = %e
                );
                Ok(false)
            }
        }
    }

    /// Immediate forced kill. Idempotent like [`terminate`].
    ///
    /// [`terminate`]: InstanceManager::terminate
    pub fn force_terminate(&self, id: &str) -> Result<bool, InstanceError> {
        let Some(target) = self.termination_target(id) else {
            return Ok(false);
        };
        if target.already_terminal {
            return Ok(true);
        }

        info!(
            event = "core.instance.force_terminate_started",
            instance_id = id
        );

        if target.pid > 0 {
            let result = process_ops::kill_process(
                target.pid,
                target.process.as_ref().map(|p| p.name.as_str()),
                target.process.as_ref().map(|p| p.start_time),
            );
            match result {
                Ok(())
                | Err(crate::process::ProcessError::NotFound { .. })
                | Err(crate::process::ProcessError::PidReused { .. }) => {}
                Err(e) => {
                    error!(
                        event = "core.instance.force_terminate_failed",
                        instance_id = id,
                        error = %e
                    );
                    return Ok(false);
                }
            }
        } else if let Some(handle) = target.real_window {
            if let Err(e) = self.window_manager.close(handle) {
                debug!(
                    event = "core.instance.force_terminate_close_failed",
                    instance_id = id,
                    error = %e
                );
            }
        }

        self.mark_exited(id, "force terminated", "instance_manager")?;
        Ok(true)
    }

    /// Snapshot of one instance.
    pub fn get(&self, id: &str) -> Option<ApplicationInstance> {
        self.lock_registry().get(id).cloned()
    }

    /// Snapshot of every registered instance, terminal included.
    pub fn get_all(&self) -> Vec<ApplicationInstance> {
        self.lock_registry().values().cloned().collect()
    }

    /// Snapshots of all non-terminal instances.
    pub fn get_running(&self) -> Vec<ApplicationInstance> {
        self.lock_registry()
            .values()
            .filter(|i| !i.state.is_terminal())
            .cloned()
            .collect()
    }

    /// Non-terminal instances launched by the given principal.
    pub fn get_running_for_user(&self, principal: &str) -> Vec<ApplicationInstance> {
        self.lock_registry()
            .values()
            .filter(|i| !i.state.is_terminal() && i.principal == principal)
            .cloned()
            .collect()
    }

    /// `(instance id, pid, identity)` for every live instance the
    /// process monitor should poll.
    pub fn tracked_pids(&self) -> Vec<(String, u32, Option<ProcessMetadata>)> {
        self.lock_registry()
            .values()
            .filter(|i| !i.state.is_terminal() && i.pid > 0)
            .map(|i| (i.id.clone(), i.pid, i.process.clone()))
            .collect()
    }

    /// Live ambiguous-origin instances with a real correlated window,
    /// for the window-liveness loop.
    pub fn correlated_ambiguous(&self) -> Vec<(String, crate::windows::WindowHandle)> {
        self.lock_registry()
            .values()
            .filter(|i| {
                !i.state.is_terminal()
                    && i.descriptor.kind == ApplicationKind::AndroidPackage
                    && i.has_real_window()
            })
            .filter_map(|i| i.window.as_ref().map(|w| (i.id.clone(), w.handle)))
            .collect()
    }

    /// Remove terminal instances older than the retention threshold.
    ///
    /// Safe to call repeatedly; returns the number reaped.
    pub fn cleanup(&self) -> usize {
        let cutoff = Utc::now() - chrono::TimeDelta::seconds(self.retention_secs);
        let mut registry = self.lock_registry();
        let before = registry.len();
        registry.retain(|_, instance| {
            let expired = instance.state.is_terminal()
                && instance.ended_at.is_some_and(|ended| ended < cutoff);
            !expired
        });
        let removed = before - registry.len();
        if removed > 0 {
            info!(event = "core.instance.cleanup_completed", removed = removed);
        }
        removed
    }

    fn lock_registry(&self) -> std::sync::MutexGuard<'_, HashMap<String, ApplicationInstance>> {
        self.registry.lock().expect("instance registry lock poisoned")
    }

    /// Apply a guarded state transition and emit its event. Caller
    /// holds the registry lock.
    fn transition_locked(
        &self,
        registry: &mut HashMap<String, ApplicationInstance>,
        id: &str,
        new_state: InstanceState,
        reason: Option<&str>,
        source: Option<&str>,
    ) -> Result<(), InstanceError> {
        let instance = registry
            .get_mut(id)
            .ok_or_else(|| InstanceError::NotFound { id: id.to_string() })?;

        let previous = instance.state;
        if !previous.can_transition_to(new_state) {
            return Err(InstanceError::InvalidTransition {
                id: id.to_string(),
                from: previous,
                to: new_state,
            });
        }

        instance.state = new_state;
        instance.updated_at = Utc::now();
        if new_state.is_terminal() && instance.ended_at.is_none() {
            instance.ended_at = Some(instance.updated_at);
        }

        info!(
            event = "core.instance.state_changed",
            instance_id = id,
            from = previous.as_str(),
            to = new_state.as_str(),
            reason = reason.unwrap_or("")
        );

        let mut event = InstanceEvent::new(
            event_kind_for_transition(new_state),
            instance.clone(),
            Some(previous),
            Some(new_state),
        );
        if let Some(reason) = reason {
            event = event.with_reason(reason);
        }
        if let Some(source) = source {
            event = event.with_source(source);
        }
        let _ = self.events.send(event);
        Ok(())
    }

    fn termination_target(&self, id: &str) -> Option<TerminationTarget> {
        let registry = self.lock_registry();
        let instance = registry.get(id)?;
        Some(TerminationTarget {
            already_terminal: instance.state.is_terminal(),
            pid: instance.pid,
            process: instance.process.clone(),
            real_window: instance
                .window
                .as_ref()
                .filter(|w| !w.is_placeholder())
                .map(|w| w.handle),
        })
    }
}

struct TerminationTarget {
    already_terminal: bool,
    pid: u32,
    process: Option<ProcessMetadata>,
    real_window: Option<crate::windows::WindowHandle>,
}
