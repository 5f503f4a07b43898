//! # Configuration System
//!
//! TOML configuration for the appdock engine, loaded from
//! `~/.appdock/config.toml`. A missing file is not an error; every
//! setting has a built-in default.
//!
//! ```toml
//! # ~/.appdock/config.toml
//! [monitor]
//! poll_interval_secs = 2
//!
//! [android]
//! subsystem_command = "adb"
//! ```

pub mod defaults;
pub mod loading;
pub mod types;

pub use loading::{load_from_file, validate_config};
pub use types::{
    AndroidConfig, AppdockConfig, BrowserConfig, CorrelationConfig, InstancesConfig, MonitorConfig,
};

impl AppdockConfig {
    /// Load configuration from the default user config file.
    ///
    /// See [`loading::load`] for details.
    pub fn load() -> Result<Self, crate::errors::ConfigError> {
        loading::load()
    }

    /// Validate the configuration.
    ///
    /// See [`loading::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        loading::validate_config(self)
    }
}
