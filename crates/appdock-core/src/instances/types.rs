use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ApplicationDescriptor;
use crate::process::ProcessMetadata;
use crate::windows::WindowHandle;

/// Lifecycle state of a running application instance.
///
/// Transitions are monotonic toward the terminal states: a `Terminated`
/// or `Error` instance never leaves that state — relaunching issues a
/// new instance id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceState {
    /// Registered, launch in flight.
    Starting,
    /// Launched and tracked; focus state unknown.
    Running,
    /// Foreground for its principal.
    Active,
    /// Running but not foreground.
    Inactive,
    /// Alive but failed a graceful stop or liveness check.
    NotResponding,
    /// Exited or stopped. Terminal.
    Terminated,
    /// Unrecoverable failure. Terminal.
    Error,
}

impl InstanceState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstanceState::Terminated | InstanceState::Error)
    }

    /// Whether the state machine permits moving to `to` from here.
    ///
    /// `Error` is reachable from any non-terminal state; `Active` and
    /// `Inactive` toggle freely but both require having passed through
    /// `Running`.
    pub fn can_transition_to(&self, to: InstanceState) -> bool {
        use InstanceState::*;
        match (self, to) {
            (Terminated | Error, _) => false,
            (_, Error) => true,
            (_, Terminated) => true,
            (Starting, Running) => true,
            (Running, Active | Inactive | NotResponding) => true,
            (Active, Inactive | NotResponding) => true,
            (Inactive, Active | NotResponding) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceState::Starting => "starting",
            InstanceState::Running => "running",
            InstanceState::Active => "active",
            InstanceState::Inactive => "inactive",
            InstanceState::NotResponding => "not_responding",
            InstanceState::Terminated => "terminated",
            InstanceState::Error => "error",
        }
    }
}

/// The window associated with an instance.
///
/// Either a real correlated OS window or a synthetic placeholder when
/// correlation failed. Placeholder instances still participate in the
/// state machine but cannot be switched to via the window manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceWindow {
    pub handle: WindowHandle,
    pub title: String,
}

impl InstanceWindow {
    pub fn real(handle: WindowHandle, title: impl Into<String>) -> Self {
        Self {
            handle,
            title: title.into(),
        }
    }

    /// Synthetic stand-in used when correlation fails.
    pub fn placeholder(display_name: &str) -> Self {
        Self {
            handle: WindowHandle::PLACEHOLDER,
            title: format!("{} (Android)", display_name),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.handle.is_placeholder()
    }
}

/// Mutable runtime record of one launched application.
///
/// Exclusively owned by the instance manager once registered; all other
/// components hold snapshots and route mutation through manager
/// operations so the state machine invariant holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationInstance {
    /// Unique for the orchestrator's process lifetime; never reused.
    pub id: String,
    /// Owning catalog entry. Read-only.
    pub descriptor: ApplicationDescriptor,
    /// Principal that launched the instance.
    pub principal: String,
    /// OS process id; 0 when unknown (web pages, folders, degraded
    /// Android launches).
    pub pid: u32,
    /// Process identity captured at launch, for PID-reuse validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<ProcessMetadata>,
    /// Correlated or placeholder window; absent before correlation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<InstanceWindow>,
    pub state: InstanceState,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set exactly once, on reaching a terminal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Kind-specific data, e.g. the Android package name.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl ApplicationInstance {
    pub fn new(descriptor: ApplicationDescriptor, principal: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            descriptor,
            principal,
            pid: 0,
            process: None,
            window: None,
            state: InstanceState::Starting,
            started_at: now,
            updated_at: now,
            ended_at: None,
            metadata: HashMap::new(),
        }
    }

    /// Whether the instance has a real (non-placeholder) window.
    pub fn has_real_window(&self) -> bool {
        self.window
            .as_ref()
            .is_some_and(|w| !w.is_placeholder())
    }
}
