use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque OS window handle.
///
/// The zero handle is reserved as the placeholder used when no real
/// window could be correlated with a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(u32);

impl WindowHandle {
    /// Synthetic handle for instances whose window was never found.
    pub const PLACEHOLDER: WindowHandle = WindowHandle(0);

    pub fn new(raw: u32) -> Result<Self, crate::windows::errors::WindowError> {
        if raw == 0 {
            return Err(crate::windows::errors::WindowError::InvalidHandle { raw });
        }
        Ok(Self(raw))
    }

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn is_placeholder(&self) -> bool {
        self.0 == 0
    }
}

/// Raw window record as returned by a single enumeration pass.
///
/// Carries only what the OS snapshot exposes; creation time is not
/// available and is tracked separately as first-seen time.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSnapshot {
    pub handle: WindowHandle,
    pub title: String,
    pub owner_pid: Option<u32>,
    /// Window class / owning application name.
    pub class: String,
}

/// OS window snapshot enriched with best-effort creation time.
///
/// Produced by the window manager; never mutated, re-fetched on demand.
/// `first_seen` is the first enumeration pass that observed the handle,
/// which is the closest available stand-in for creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
    pub owner_pid: Option<u32>,
    pub class: String,
    pub first_seen: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_handle() {
        assert!(WindowHandle::PLACEHOLDER.is_placeholder());
        assert!(!WindowHandle::from_raw(7).is_placeholder());
    }

    #[test]
    fn test_handle_new_rejects_zero() {
        assert!(WindowHandle::new(0).is_err());
        assert_eq!(WindowHandle::new(12).unwrap().as_u32(), 12);
    }

    #[test]
    fn test_window_info_serde_roundtrip() {
        let info = WindowInfo {
            handle: WindowHandle::from_raw(42),
            title: "Expenses".to_string(),
            owner_pid: Some(1234),
            class: "ApplicationFrameWindow".to_string(),
            first_seen: Utc::now(),
        };
        let json = serde_json::to_string(&info).unwrap();
        let parsed: WindowInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, parsed);
    }
}
