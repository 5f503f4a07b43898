use crate::errors::AppdockError;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Window enumeration failed: {message}")]
    EnumerationFailed { message: String },

    #[error("Window '{handle}' not found")]
    NotFound { handle: u32 },

    #[error("Failed to activate window '{handle}': {message}")]
    ActivationFailed { handle: u32, message: String },

    #[error("Window activation is not supported on this platform")]
    ActivationUnsupported,

    #[error("Invalid window handle: {raw}")]
    InvalidHandle { raw: u32 },
}

impl AppdockError for WindowError {
    fn error_code(&self) -> &'static str {
        match self {
            WindowError::EnumerationFailed { .. } => "WINDOW_ENUMERATION_FAILED",
            WindowError::NotFound { .. } => "WINDOW_NOT_FOUND",
            WindowError::ActivationFailed { .. } => "WINDOW_ACTIVATION_FAILED",
            WindowError::ActivationUnsupported => "WINDOW_ACTIVATION_UNSUPPORTED",
            WindowError::InvalidHandle { .. } => "WINDOW_INVALID_HANDLE",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, WindowError::NotFound { .. })
    }
}
