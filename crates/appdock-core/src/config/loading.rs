//! Configuration loading and validation.
//!
//! Configuration is loaded from `~/.appdock/config.toml`. A missing file
//! is not an error — defaults apply. Parse and validation failures are.

use std::fs;
use std::path::Path;

use crate::config::types::AppdockConfig;
use crate::errors::ConfigError;

/// Load configuration from the default user config file.
///
/// Returns defaults when the file does not exist.
pub fn load() -> Result<AppdockConfig, ConfigError> {
    let Some(home_dir) = dirs::home_dir() else {
        // No home directory means no config file to read; run on defaults.
        return Ok(AppdockConfig::default());
    };
    let config_path = home_dir.join(".appdock").join("config.toml");
    if !config_path.exists() {
        return Ok(AppdockConfig::default());
    }
    load_from_file(&config_path)
}

/// Load and validate configuration from a specific file.
pub fn load_from_file(path: &Path) -> Result<AppdockConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppdockConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            message: format!("{}: {}", path.display(), e),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate a configuration, whatever its source.
pub fn validate_config(config: &AppdockConfig) -> Result<(), ConfigError> {
    if config.monitor.poll_interval_secs == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "monitor.poll_interval_secs must be greater than zero".to_string(),
        });
    }
    if config.monitor.window_poll_interval_secs == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "monitor.window_poll_interval_secs must be greater than zero".to_string(),
        });
    }
    if config.correlation.window_secs <= 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "correlation.window_secs must be positive".to_string(),
        });
    }
    if config.android.subsystem_command.trim().is_empty() {
        return Err(ConfigError::InvalidConfiguration {
            message: "android.subsystem_command must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_from_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_load_from_file_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not [valid toml").unwrap();
        let result = load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_from_file_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[monitor]\npoll_interval_secs = 7\n").unwrap();
        let config = load_from_file(&path).unwrap();
        assert_eq!(config.monitor.poll_interval_secs, 7);
    }

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let mut config = AppdockConfig::default();
        config.monitor.poll_interval_secs = 0;
        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_nonpositive_correlation_window() {
        let mut config = AppdockConfig::default();
        config.correlation.window_secs = 0;
        assert!(validate_config(&config).is_err());
        config.correlation.window_secs = -5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_subsystem_command() {
        let mut config = AppdockConfig::default();
        config.android.subsystem_command = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(validate_config(&AppdockConfig::default()).is_ok());
    }
}
