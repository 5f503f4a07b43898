use crate::errors::AppdockError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Application '{id}' not found in catalog")]
    NotFound { id: String },

    #[error("Invalid descriptor '{id}': {message}")]
    InvalidDescriptor { id: String, message: String },
}

impl AppdockError for CatalogError {
    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::NotFound { .. } => "CATALOG_NOT_FOUND",
            CatalogError::InvalidDescriptor { .. } => "CATALOG_INVALID_DESCRIPTOR",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
