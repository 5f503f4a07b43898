//! Default implementations for configuration types.
//!
//! All `Default` impls and the helper functions referenced by
//! `#[serde(default = "...")]` attributes live here.

use crate::config::types::{
    AndroidConfig, BrowserConfig, CorrelationConfig, InstancesConfig, MonitorConfig,
};

/// Returns the default process poll interval (2 seconds).
pub fn default_poll_interval_secs() -> u64 {
    2
}

/// Returns the default window liveness poll interval (5 seconds).
///
/// Window enumeration is heavier than a process-table poll, so the
/// window loop runs at a lower frequency.
pub fn default_window_poll_interval_secs() -> u64 {
    5
}

/// Returns the default correlation window half-width (30 seconds).
///
/// Candidate windows must have appeared within this many seconds of
/// the launch timestamp, on either side.
pub fn default_correlation_window_secs() -> i64 {
    30
}

/// Returns the default correlation cache TTL (20 seconds).
pub fn default_correlation_cache_ttl_secs() -> u64 {
    20
}

/// Returns the default terminal-instance retention (300 seconds).
pub fn default_retention_secs() -> i64 {
    300
}

/// Returns the default graceful termination wait (5 seconds).
pub fn default_graceful_timeout_secs() -> u64 {
    5
}

/// Returns the default compatibility-subsystem client command.
pub fn default_subsystem_command() -> String {
    "adb".to_string()
}

/// Returns the default application frame class for subsystem windows.
pub fn default_frame_class() -> String {
    "ApplicationFrameWindow".to_string()
}

/// Returns the default browser binaries probed for app-mode support.
pub fn default_app_mode_candidates() -> Vec<String> {
    vec![
        "msedge".to_string(),
        "chrome".to_string(),
        "chromium".to_string(),
        "brave".to_string(),
    ]
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            window_poll_interval_secs: default_window_poll_interval_secs(),
        }
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            window_secs: default_correlation_window_secs(),
            cache_ttl_secs: default_correlation_cache_ttl_secs(),
        }
    }
}

impl Default for InstancesConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention_secs(),
            graceful_timeout_secs: default_graceful_timeout_secs(),
        }
    }
}

impl Default for AndroidConfig {
    fn default() -> Self {
        Self {
            subsystem_command: default_subsystem_command(),
            frame_class: default_frame_class(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            app_mode_candidates: default_app_mode_candidates(),
        }
    }
}
