//! Record service errors

use thiserror::Error;

use crate::connection::ConnectionError;

/// Result type for record service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outcome kinds of a failed record service call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Input outside the declared field constraints; nothing was sent to the store
    #[error("{0}")]
    Validation(String),

    /// No row matches the given part number
    #[error("part {0} not found")]
    NotFound(i32),

    /// A row with the given part number already exists
    #[error("part {0} already exists")]
    Conflict(i32),

    /// Configuration, open, execute or commit failure
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }

    /// Whether this is a domain outcome rather than an infrastructure failure
    pub fn is_domain(&self) -> bool {
        !matches!(self, ServiceError::Connection(_))
    }
}
