use crate::errors::AppdockError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Process '{pid}' not found")]
    NotFound { pid: u32 },

    #[error("Failed to kill process '{pid}': {message}")]
    KillFailed { pid: u32, message: String },

    #[error("System error: {message}")]
    SystemError { message: String },

    #[error("Invalid PID: {pid}")]
    InvalidPid { pid: u32 },

    #[error("PID '{pid}' has been reused (expected: {expected}, actual: {actual})")]
    PidReused {
        pid: u32,
        expected: String,
        actual: String,
    },
}

impl AppdockError for ProcessError {
    fn error_code(&self) -> &'static str {
        match self {
            ProcessError::NotFound { .. } => "PROCESS_NOT_FOUND",
            ProcessError::KillFailed { .. } => "PROCESS_KILL_FAILED",
            ProcessError::SystemError { .. } => "PROCESS_SYSTEM_ERROR",
            ProcessError::InvalidPid { .. } => "PROCESS_INVALID_PID",
            ProcessError::PidReused { .. } => "PROCESS_PID_REUSED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ProcessError::NotFound { .. } | ProcessError::InvalidPid { .. }
        )
    }
}
