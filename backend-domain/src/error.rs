use thiserror::Error;

/// Malformed input rejected before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("shift '{shift_id}' overlaps shift '{other_shift_id}' for member '{member_id}'")]
    Overlap {
        member_id: String,
        shift_id: String,
        other_shift_id: String,
    },
}
