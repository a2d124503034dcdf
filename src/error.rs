use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("end date {end} is before start date {start}")]
    InvalidDateRange { start: String, end: String },

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Could not decode {what}: {reason}")]
    Decode { what: String, reason: String },

    #[error("Persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl BookError {
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        BookError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// True for input that was rejected before anything was mutated.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookError::BlankField { .. } | BookError::InvalidDateRange { .. }
        )
    }
}

pub type BookResult<T> = Result<T, BookError>;
