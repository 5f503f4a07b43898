pub mod backends;
pub mod errors;
pub mod registry;
pub mod traits;
pub mod types;

pub use errors::LauncherError;
pub use registry::LauncherRegistry;
pub use traits::{LauncherBackend, WindowEventSource};
pub use types::{LaunchResult, Launched, LauncherWindowEvent, LauncherWindowEventKind};
