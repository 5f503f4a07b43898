use crate::errors::AppdockError;
use crate::instances::types::InstanceState;

#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("Instance '{id}' is already registered")]
    DuplicateInstance { id: String },

    #[error("Instance '{id}' not found")]
    NotFound { id: String },

    #[error("Instance '{id}' cannot transition from {from:?} to {to:?}")]
    InvalidTransition {
        id: String,
        from: InstanceState,
        to: InstanceState,
    },

    #[error("Instance '{id}' must be registered in Starting state, was {state:?}")]
    NotStarting { id: String, state: InstanceState },

    #[error("IO error accessing instance store: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl AppdockError for InstanceError {
    fn error_code(&self) -> &'static str {
        match self {
            InstanceError::DuplicateInstance { .. } => "INSTANCE_DUPLICATE",
            InstanceError::NotFound { .. } => "INSTANCE_NOT_FOUND",
            InstanceError::InvalidTransition { .. } => "INSTANCE_INVALID_TRANSITION",
            InstanceError::NotStarting { .. } => "INSTANCE_NOT_STARTING",
            InstanceError::IoError { .. } => "INSTANCE_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, InstanceError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let error = InstanceError::InvalidTransition {
            id: "i-1".to_string(),
            from: InstanceState::Terminated,
            to: InstanceState::Running,
        };
        assert!(error.to_string().contains("cannot transition"));
        assert_eq!(error.error_code(), "INSTANCE_INVALID_TRANSITION");
        assert!(!error.is_user_error());
    }
}
