use backend_domain::{RosterError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("fine '{0}' is already paid")]
    AlreadyPaid(String),
    #[error("ledger credit failed: {0}")]
    LedgerCredit(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        AppError::BadRequest(value.to_string())
    }
}

impl From<RosterError> for AppError {
    fn from(value: RosterError) -> Self {
        match value {
            RosterError::Invalid(err) => AppError::BadRequest(err.to_string()),
            overlap @ RosterError::Overlap { .. } => AppError::Conflict(overlap.to_string()),
        }
    }
}
