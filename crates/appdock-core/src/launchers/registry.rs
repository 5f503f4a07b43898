//! Launcher registry: predicate-based backend lookup.

use tracing::debug;

use crate::catalog::ApplicationDescriptor;
use crate::config::AppdockConfig;
use crate::launchers::backends::{
    AndroidLauncher, BrowserAppLauncher, FolderLauncher, NativeLauncher, WebPageLauncher,
};
use crate::launchers::errors::LauncherError;
use crate::launchers::traits::{LauncherBackend, WindowEventSource};

/// Ordered set of launch strategies.
///
/// Selection is first-match-wins over the capability predicates. The
/// stock backends claim disjoint kinds, so in practice exactly one
/// backend serves each descriptor.
pub struct LauncherRegistry {
    backends: Vec<Box<dyn LauncherBackend>>,
}

impl LauncherRegistry {
    /// Build the stock backend set from configuration.
    pub fn from_config(config: &AppdockConfig) -> Self {
        Self::with_backends(vec![
            Box::new(NativeLauncher),
            Box::new(WebPageLauncher),
            Box::new(BrowserAppLauncher::new(&config.browser)),
            Box::new(FolderLauncher),
            Box::new(AndroidLauncher::new(&config.android)),
        ])
    }

    /// Build a registry from an explicit backend list. Used by tests
    /// and embedders with custom strategies.
    pub fn with_backends(backends: Vec<Box<dyn LauncherBackend>>) -> Self {
        Self { backends }
    }

    /// Find the first backend claiming the descriptor.
    pub fn find(
        &self,
        descriptor: &ApplicationDescriptor,
    ) -> Result<&dyn LauncherBackend, LauncherError> {
        for backend in &self.backends {
            if backend.can_launch(descriptor) {
                debug!(
                    event = "core.launcher.backend_selected",
                    backend = backend.kind_name(),
                    app_id = %descriptor.id
                );
                return Ok(backend.as_ref());
            }
        }
        Err(LauncherError::NoSuitableLauncher {
            kind: descriptor.kind.as_str().to_string(),
        })
    }

    /// Backend kind names in selection order.
    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.kind_name()).collect()
    }

    /// Backends exposing the optional window-event capability.
    pub fn window_event_sources(&self) -> Vec<&dyn WindowEventSource> {
        self.backends
            .iter()
            .filter_map(|b| b.window_events())
            .collect()
    }
}
