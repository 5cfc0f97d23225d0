use thiserror::Error;

use crate::domain::{RecordId, RecordKind};

/// Maximum accepted description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{kind} record not found: {id}")]
    RecordNotFound { kind: RecordKind, id: RecordId },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown {kind} category: {category}")]
    UnknownCategory { kind: RecordKind, category: String },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Description exceeds {MAX_DESCRIPTION_LEN} characters")]
    DescriptionTooLong,

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    /// True for errors caused by invalid input, as opposed to a missing
    /// record or an infrastructure failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidAmount(_)
                | AppError::UnknownCategory { .. }
                | AppError::MissingField(_)
                | AppError::DescriptionTooLong
        )
    }
}
