//! Instance lifecycle event stream.
//!
//! Every state transition in the instance registry emits exactly one
//! [`InstanceEvent`]. Events describe what happened, not what should
//! happen, and carry an instance snapshot so subscribers never need to
//! reach back into the registry. For a given instance, events are
//! delivered in the order its state actually changed; no ordering is
//! guaranteed across instances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::instances::types::{ApplicationInstance, InstanceState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceEventKind {
    /// A new instance entered the registry.
    Started,
    /// An instance reached `Terminated`.
    Stopped,
    /// Any other state transition.
    StateChanged,
    /// An instance was brought to the foreground.
    Activated,
    /// An instance reached the `Error` sink state.
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceEvent {
    pub kind: InstanceEventKind,
    /// Snapshot of the instance at emission time.
    pub instance: ApplicationInstance,
    pub timestamp: DateTime<Utc>,
    pub previous_state: Option<InstanceState>,
    pub new_state: Option<InstanceState>,
    /// Free-text reason, e.g. "process exited".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Component that triggered the transition, e.g. "process_monitor".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl InstanceEvent {
    pub fn new(
        kind: InstanceEventKind,
        instance: ApplicationInstance,
        previous_state: Option<InstanceState>,
        new_state: Option<InstanceState>,
    ) -> Self {
        Self {
            kind,
            instance,
            timestamp: Utc::now(),
            previous_state,
            new_state,
            reason: None,
            source: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Map a state transition to the single event kind it emits.
pub fn event_kind_for_transition(new_state: InstanceState) -> InstanceEventKind {
    match new_state {
        InstanceState::Terminated => InstanceEventKind::Stopped,
        InstanceState::Error => InstanceEventKind::Error,
        InstanceState::Active => InstanceEventKind::Activated,
        _ => InstanceEventKind::StateChanged,
    }
}
