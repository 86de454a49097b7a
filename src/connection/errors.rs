//! Connection errors
//!
//! Every variant carries the driver's message verbatim. Callers that put
//! these messages into logs or responses run them through
//! [`mask_credentials`](super::mask_credentials) first.

use thiserror::Error;

/// Result type for connection-level operations
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Failures while opening or using a backing-store connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// No connection string could be assembled from the configuration
    #[error("connection settings are not configured (set AS400_CONNECTION_STRING, AS400_DSN or AS400_HOST)")]
    NotConfigured,

    /// The driver environment could not be initialized
    #[error("failed to initialize ODBC environment: {0}")]
    Environment(String),

    /// Opening the connection failed
    #[error("failed to open connection: {0}")]
    Open(String),

    /// A statement failed to prepare or execute
    #[error("statement failed: {0}")]
    Statement(String),

    /// Commit failed
    #[error("commit failed: {0}")]
    Commit(String),

    /// A column value could not be read into the expected type
    #[error("unexpected column value: {0}")]
    Decode(String),
}
