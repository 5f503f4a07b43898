//! Launcher backend trait definitions.

use tokio::sync::broadcast;

use crate::catalog::ApplicationDescriptor;
use crate::launchers::errors::LauncherError;
use crate::launchers::types::{Launched, LauncherWindowEvent};

/// Trait defining the interface for launch strategies.
///
/// Each supported application kind (native process, web page, browser
/// app mode, folder, Android package) implements this trait to provide
/// kind-specific launch behavior and failure handling.
pub trait LauncherBackend: Send + Sync {
    /// The canonical name of the kind this backend serves.
    fn kind_name(&self) -> &'static str;

    /// Capability predicate: whether this backend claims the descriptor.
    fn can_launch(&self, descriptor: &ApplicationDescriptor) -> bool;

    /// Start the application described by `descriptor`.
    ///
    /// Returns the raw OS-level result. Degraded outcomes (launched but
    /// no observable process) are successes with `pid == 0`, not errors.
    fn launch(
        &self,
        descriptor: &ApplicationDescriptor,
        principal: &str,
    ) -> Result<Launched, LauncherError>;

    /// Optional capability: backends with an independent window-tracking
    /// mechanism expose activation/closure events here. Most backends
    /// cannot observe this and return `None`; callers must not require
    /// the capability.
    fn window_events(&self) -> Option<&dyn WindowEventSource> {
        None
    }
}

/// Secondary capability for backends that observe their own windows.
pub trait WindowEventSource: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<LauncherWindowEvent>;
}
