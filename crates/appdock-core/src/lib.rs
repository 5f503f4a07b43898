//! appdock-core: Application lifecycle and window correlation engine
//!
//! This library launches heterogeneous application kinds (native
//! processes, web pages, browser app-mode windows, folders, Android
//! packages in a compatibility subsystem), tracks each launch as a
//! logical instance with a state machine, correlates instances with OS
//! windows, and emits lifecycle events. It is used by the CLI and by
//! embedders that bring their own catalog and audit sink.
//!
//! # Main Entry Points
//!
//! - [`orchestrator`] - Launch, switch, terminate, monitor
//! - [`catalog`] - Application descriptors and the catalog seam
//! - [`instances`] - Instance registry and state machine
//! - [`windows`] - Window enumeration and correlation
//! - [`launchers`] - Per-kind launch strategies
//! - [`config`] - Configuration management

pub mod audit;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod events;
pub mod instances;
pub mod launchers;
pub mod logging;
pub mod orchestrator;
pub mod process;
pub mod windows;

// Re-export commonly used types at crate root for convenience
pub use audit::{AuditSink, EnvPrincipalProvider, LogAuditSink, PrincipalProvider};
pub use catalog::{AppCatalog, ApplicationDescriptor, ApplicationKind, MemoryCatalog};
pub use config::AppdockConfig;
pub use errors::{AppdockError, AppdockResult, OrchestratorError};
pub use events::{InstanceEvent, InstanceEventKind};
pub use instances::types::{ApplicationInstance, InstanceState, InstanceWindow};
pub use instances::InstanceManager;
pub use launchers::{LaunchResult, LauncherBackend, LauncherRegistry};
pub use orchestrator::Orchestrator;
pub use process::ProcessMonitor;
pub use windows::{WindowHandle, WindowManager};

// Re-export logging initialization
pub use logging::init_logging;
