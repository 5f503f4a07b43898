use crate::errors::AppdockError;

#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("No suitable launcher for application kind '{kind}'")]
    NoSuitableLauncher { kind: String },

    #[error("Launch of '{target}' failed: {message}")]
    LaunchFailed { target: String, message: String },

    #[error("Compatibility subsystem client '{command}' is not available")]
    SubsystemUnavailable { command: String },

    #[error("No supported browser found (tried: {tried})")]
    BrowserUnavailable { tried: String },

    #[error("Target path does not exist: {path}")]
    TargetNotFound { path: String },
}

impl AppdockError for LauncherError {
    fn error_code(&self) -> &'static str {
        match self {
            LauncherError::NoSuitableLauncher { .. } => "LAUNCHER_NO_SUITABLE",
            LauncherError::LaunchFailed { .. } => "LAUNCHER_LAUNCH_FAILED",
            LauncherError::SubsystemUnavailable { .. } => "LAUNCHER_SUBSYSTEM_UNAVAILABLE",
            LauncherError::BrowserUnavailable { .. } => "LAUNCHER_BROWSER_UNAVAILABLE",
            LauncherError::TargetNotFound { .. } => "LAUNCHER_TARGET_NOT_FOUND",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            LauncherError::NoSuitableLauncher { .. } | LauncherError::TargetNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_suitable_launcher_mentions_kind() {
        let error = LauncherError::NoSuitableLauncher {
            kind: "android_package".to_string(),
        };
        assert!(error.to_string().contains("No suitable launcher"));
        assert!(error.to_string().contains("android_package"));
        assert_eq!(error.error_code(), "LAUNCHER_NO_SUITABLE");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_launch_failed_carries_message() {
        let error = LauncherError::LaunchFailed {
            target: "/opt/corp/tool".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert!(error.to_string().contains("/opt/corp/tool"));
        assert!(error.to_string().contains("No such file"));
        assert!(!error.is_user_error());
    }
}
