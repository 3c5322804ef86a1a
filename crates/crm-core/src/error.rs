//! Error types for the freelancer CRM.

use thiserror::Error;

use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),
}

impl CrmError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

impl From<FieldErrors> for CrmError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

pub type CrmResult<T> = Result<T, CrmError>;
