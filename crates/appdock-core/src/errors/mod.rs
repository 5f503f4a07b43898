use std::error::Error;

/// Base trait for all application errors
pub trait AppdockError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type AppdockResult<T> = Result<T, Box<dyn AppdockError>>;

/// Errors raised by the orchestrator boundary itself.
///
/// Launcher failures are not represented here — they are converted into a
/// failed `LaunchResult` at the orchestrator boundary. Unknown instance
/// ids yield `Ok(false)` from switch/terminate, never an error.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Invalid argument '{name}': {message}")]
    ArgumentInvalid { name: String, message: String },

    #[error("Monitoring is not running")]
    MonitoringNotRunning,
}

impl AppdockError for OrchestratorError {
    fn error_code(&self) -> &'static str {
        match self {
            OrchestratorError::ArgumentInvalid { .. } => "ARGUMENT_INVALID",
            OrchestratorError::MonitoringNotRunning => "MONITORING_NOT_RUNNING",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, OrchestratorError::ArgumentInvalid { .. })
    }
}

impl OrchestratorError {
    /// Build an `ArgumentInvalid` for an empty required string input.
    pub fn empty_argument(name: &str) -> Self {
        OrchestratorError::ArgumentInvalid {
            name: name.to_string(),
            message: "must not be empty".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config file: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("IO error reading config: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl AppdockError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigParseError { .. } | ConfigError::InvalidConfiguration { .. }
        )
    }
}
