use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::process::ProcessMetadata;

/// Raw output of a backend launch: what the OS handed back before any
/// instance bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Launched {
    /// OS process id, 0 when the backend cannot observe one (web pages,
    /// folders, compatibility-subsystem launches).
    pub pid: u32,
    /// Process identity captured at launch, for PID-reuse validation.
    pub process: Option<ProcessMetadata>,
    /// Kind-specific data carried onto the instance record.
    pub metadata: HashMap<String, String>,
}

impl Launched {
    pub fn with_pid(pid: u32, process: Option<ProcessMetadata>) -> Self {
        Self {
            pid,
            process,
            metadata: HashMap::new(),
        }
    }

    /// A launch with no observable process, e.g. handed to an opener.
    pub fn detached() -> Self {
        Self::default()
    }
}

/// Public outcome of a launch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchResult {
    pub success: bool,
    /// Set on success (including degraded successes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    /// 0 when unknown.
    pub pid: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed: Duration,
}

impl LaunchResult {
    pub fn succeeded(instance_id: String, pid: u32, elapsed: Duration) -> Self {
        Self {
            success: true,
            instance_id: Some(instance_id),
            pid,
            error: None,
            elapsed,
        }
    }

    pub fn failed(message: String, elapsed: Duration) -> Self {
        Self {
            success: false,
            instance_id: None,
            pid: 0,
            error: Some(message),
            elapsed,
        }
    }
}

/// Window lifecycle notification raised by backends that track their
/// own windows independently of the host window list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherWindowEvent {
    pub kind: LauncherWindowEventKind,
    /// Backend-specific target, e.g. the Android package name.
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherWindowEventKind {
    Activated,
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_result_constructors() {
        let ok = LaunchResult::succeeded("i-1".to_string(), 42, Duration::from_millis(120));
        assert!(ok.success);
        assert_eq!(ok.instance_id.as_deref(), Some("i-1"));
        assert_eq!(ok.pid, 42);
        assert!(ok.error.is_none());

        let err = LaunchResult::failed("boom".to_string(), Duration::from_millis(5));
        assert!(!err.success);
        assert!(err.instance_id.is_none());
        assert_eq!(err.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_launched_detached_has_no_pid() {
        let launched = Launched::detached();
        assert_eq!(launched.pid, 0);
        assert!(launched.process.is_none());
    }
}
