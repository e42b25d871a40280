//! Store-specific error types and conversions.

use heva_core::error::HevaError;

/// Store-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Seed file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Seed parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate record id: {entity} with id {id}")]
    DuplicateId { entity: String, id: String },
}

impl StoreError {
    pub(crate) fn not_found(entity: &str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<StoreError> for HevaError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => HevaError::NotFound { entity, id },
            StoreError::DuplicateId { entity, .. } => HevaError::AlreadyExists { entity },
            other => HevaError::Storage(other.to_string()),
        }
    }
}
