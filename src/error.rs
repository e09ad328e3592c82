use thiserror::Error;

/// Errors raised by the document store layer
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Identifier is not a valid 24-character hex ObjectId
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Error reported by the database driver (network, auth, server errors)
    #[error("Database error: {0}")]
    Database(String),

    /// A payload could not be converted to or from BSON
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Errors surfaced by the portal service to HTTP handlers
#[derive(Debug, Clone, Error)]
pub enum PortalError {
    /// Authenticated identity does not own the requested resource (HTTP 403)
    #[error("Forbidden: session does not match requested email")]
    Forbidden,

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}
