//! Android package backend via the compatibility-subsystem client.
//!
//! Launching a package tells the subsystem to start its launcher
//! activity. The subsystem gives back no process id and no window
//! linkage; a launch that completes without error is a degraded
//! success, and window correlation happens separately.

use std::process::Command;

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::catalog::{ApplicationDescriptor, ApplicationKind};
use crate::config::AndroidConfig;
use crate::launchers::errors::LauncherError;
use crate::launchers::traits::{LauncherBackend, WindowEventSource};
use crate::launchers::types::{Launched, LauncherWindowEvent, LauncherWindowEventKind};

const WINDOW_EVENT_CAPACITY: usize = 32;

pub struct AndroidLauncher {
    command: String,
    window_events: broadcast::Sender<LauncherWindowEvent>,
}

impl AndroidLauncher {
    pub fn new(config: &AndroidConfig) -> Self {
        let (window_events, _) = broadcast::channel(WINDOW_EVENT_CAPACITY);
        Self {
            command: config.subsystem_command.clone(),
            window_events,
        }
    }

    fn subsystem_available(&self) -> bool {
        which::which(&self.command).is_ok()
    }

    /// Feed a subsystem window notification into the event stream.
    ///
    /// Called by subsystem integration glue; harmless when nobody is
    /// subscribed.
    pub fn notify_window_activated(&self, package: &str) {
        let _ = self.window_events.send(LauncherWindowEvent {
            kind: LauncherWindowEventKind::Activated,
            target: package.to_string(),
        });
    }

    pub fn notify_window_closed(&self, package: &str) {
        let _ = self.window_events.send(LauncherWindowEvent {
            kind: LauncherWindowEventKind::Closed,
            target: package.to_string(),
        });
    }
}

impl LauncherBackend for AndroidLauncher {
    fn kind_name(&self) -> &'static str {
        "android_package"
    }

    fn can_launch(&self, descriptor: &ApplicationDescriptor) -> bool {
        descriptor.kind == ApplicationKind::AndroidPackage
    }

    fn launch(
        &self,
        descriptor: &ApplicationDescriptor,
        principal: &str,
    ) -> Result<Launched, LauncherError> {
        if !self.subsystem_available() {
            return Err(LauncherError::SubsystemUnavailable {
                command: self.command.clone(),
            });
        }

        let package = &descriptor.target;
        info!(
            event = "core.launcher.android_launch_started",
            package = %package,
            principal = %principal
        );

        // monkey with the launcher category starts the package's main
        // activity without needing to know the activity name.
        let output = Command::new(&self.command)
            .args([
                "shell",
                "monkey",
                "-p",
                package,
                "-c",
                "android.intent.category.LAUNCHER",
                "1",
            ])
            .output()
            .map_err(|e| LauncherError::LaunchFailed {
                target: package.clone(),
                message: format!("{}: {}", self.command, e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() || stdout.contains("No activities found") {
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            warn!(
                event = "core.launcher.android_launch_failed",
                package = %package,
                message = %message
            );
            return Err(LauncherError::LaunchFailed {
                target: package.clone(),
                message,
            });
        }

        info!(event = "core.launcher.android_launch_completed", package = %package);

        let mut launched = Launched::detached();
        launched
            .metadata
            .insert("package".to_string(), package.clone());
        Ok(launched)
    }

    fn window_events(&self) -> Option<&dyn WindowEventSource> {
        Some(self)
    }
}

impl WindowEventSource for AndroidLauncher {
    fn subscribe(&self) -> broadcast::Receiver<LauncherWindowEvent> {
        self.window_events.subscribe()
    }
}
