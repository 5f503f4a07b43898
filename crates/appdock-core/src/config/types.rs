//! Configuration type definitions for appdock.
//!
//! These types are deserialized from the TOML config file at
//! `~/.appdock/config.toml`. Every section is optional; missing values
//! fall back to the defaults in [`super::defaults`].
//!
//! # Example Configuration
//!
//! ```toml
//! [monitor]
//! poll_interval_secs = 2
//! window_poll_interval_secs = 5
//!
//! [correlation]
//! window_secs = 30
//! cache_ttl_secs = 20
//!
//! [instances]
//! retention_secs = 300
//! graceful_timeout_secs = 5
//!
//! [android]
//! subsystem_command = "adb"
//!
//! [browser]
//! app_mode_candidates = ["msedge", "chrome", "chromium", "brave"]
//! ```

use serde::{Deserialize, Serialize};

/// Main configuration loaded from the TOML config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppdockConfig {
    /// Process and window polling intervals.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Window correlation heuristic tuning.
    #[serde(default)]
    pub correlation: CorrelationConfig,

    /// Instance registry retention and termination behavior.
    #[serde(default)]
    pub instances: InstancesConfig,

    /// Compatibility-subsystem (Android) launcher settings.
    #[serde(default)]
    pub android: AndroidConfig,

    /// Browser app-mode launcher settings.
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Polling loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Interval in seconds between process liveness polls.
    /// Default: 2 seconds.
    #[serde(default = "super::defaults::default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Interval in seconds between window liveness polls for
    /// ambiguous-origin (Android) instances with a correlated window.
    /// Default: 5 seconds.
    #[serde(default = "super::defaults::default_window_poll_interval_secs")]
    pub window_poll_interval_secs: u64,
}

/// Window correlation heuristic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Half-width in seconds of the time window around the launch
    /// timestamp within which a candidate window must have appeared.
    /// Default: 30 seconds.
    #[serde(default = "super::defaults::default_correlation_window_secs")]
    pub window_secs: i64,

    /// How long a correlation result is cached before the next lookup
    /// re-enumerates windows. Default: 20 seconds.
    #[serde(default = "super::defaults::default_correlation_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

/// Instance registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstancesConfig {
    /// How long terminal instances are retained in the registry before
    /// `cleanup()` reaps them. Default: 300 seconds.
    #[serde(default = "super::defaults::default_retention_secs")]
    pub retention_secs: i64,

    /// Bounded wait in seconds after a graceful termination signal
    /// before `terminate` gives up (it never escalates to a kill).
    /// Default: 5 seconds.
    #[serde(default = "super::defaults::default_graceful_timeout_secs")]
    pub graceful_timeout_secs: u64,
}

/// Compatibility-subsystem launcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AndroidConfig {
    /// Client command used to start an activity inside the
    /// compatibility subsystem. Must be on PATH.
    #[serde(default = "super::defaults::default_subsystem_command")]
    pub subsystem_command: String,

    /// Window class/app name the subsystem uses for its application
    /// frames. Correlation candidates are filtered to this class.
    #[serde(default = "super::defaults::default_frame_class")]
    pub frame_class: String,
}

/// Browser app-mode launcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Browser binaries probed in order for `--app=<url>` support.
    #[serde(default = "super::defaults::default_app_mode_candidates")]
    pub app_mode_candidates: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppdockConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AppdockConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            config.monitor.poll_interval_secs,
            parsed.monitor.poll_interval_secs
        );
        assert_eq!(config.correlation.window_secs, parsed.correlation.window_secs);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppdockConfig = toml::from_str("").unwrap();
        assert_eq!(config.monitor.poll_interval_secs, 2);
        assert_eq!(config.monitor.window_poll_interval_secs, 5);
        assert_eq!(config.correlation.window_secs, 30);
        assert_eq!(config.correlation.cache_ttl_secs, 20);
        assert_eq!(config.instances.retention_secs, 300);
        assert_eq!(config.instances.graceful_timeout_secs, 5);
        assert_eq!(config.android.subsystem_command, "adb");
    }

    #[test]
    fn test_partial_section_override() {
        let config: AppdockConfig = toml::from_str(
            r#"
[monitor]
poll_interval_secs = 10

[android]
subsystem_command = "subsys-client"
"#,
        )
        .unwrap();
        assert_eq!(config.monitor.poll_interval_secs, 10);
        // Unset field in an overridden section still defaults
        assert_eq!(config.monitor.window_poll_interval_secs, 5);
        assert_eq!(config.android.subsystem_command, "subsys-client");
    }
}
