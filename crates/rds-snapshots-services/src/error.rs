//! Collaborator error types

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error for wrapping backend-specific errors
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Errors reported by the snapshot service and object store
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Snapshot creation was rejected or could not be started
    #[error("snapshot request failed: {message}")]
    Request {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// Object store write failed
    #[error("object storage write failed: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// Existing snapshots could not be enumerated
    #[error("snapshot listing failed: {message}")]
    Listing {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// A single snapshot could not be removed
    #[error("failed to delete snapshot {snapshot_id}: {message}")]
    Delete {
        snapshot_id: String,
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// Entity not found
    #[error("not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The service answered with something we cannot interpret
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl ServiceError {
    /// Create a request error with source
    pub fn request(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Request {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a storage error with source
    pub fn storage(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a listing error with source
    pub fn listing(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Listing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a delete error with source
    pub fn delete(
        snapshot_id: impl Into<String>,
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Delete {
            snapshot_id: snapshot_id.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Short, stable name of the failure kind for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request { .. } => "request",
            Self::Storage { .. } => "storage",
            Self::Listing { .. } => "listing",
            Self::Delete { .. } => "delete",
            Self::NotFound { .. } => "not_found",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}
