//! Collaborator trait definitions
//!
//! The snapshot workflow talks to exactly two external services:
//! - SnapshotService: the managed database's snapshot API
//! - ObjectStore: the bucket that receives metadata notes
//!
//! Both are injected as trait objects so tests can substitute doubles.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::types::{SnapshotId, SnapshotRecord};

/// Snapshot API of the managed database service
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SnapshotService: Send + Sync {
    /// Start creating a snapshot of `instance_id` named `snapshot_id`
    ///
    /// Returns the identifier the service accepted. Creation continues
    /// asynchronously on the service side.
    ///
    /// # Errors
    /// * `ServiceError::Request` - The service rejected the request
    async fn create_snapshot(
        &self,
        instance_id: &str,
        snapshot_id: &SnapshotId,
    ) -> Result<SnapshotId, ServiceError>;

    /// List every snapshot the service holds for `instance_id`
    ///
    /// Order is whatever the service returns; callers must not rely on it.
    ///
    /// # Errors
    /// * `ServiceError::Listing` - Enumeration failed
    async fn list_snapshots(&self, instance_id: &str) -> Result<Vec<SnapshotRecord>, ServiceError>;

    /// Delete one snapshot
    ///
    /// # Errors
    /// * `ServiceError::NotFound` - Snapshot doesn't exist
    /// * `ServiceError::Delete` - The service refused or failed the delete
    async fn delete_snapshot(&self, snapshot_id: &SnapshotId) -> Result<(), ServiceError>;
}

/// Object storage for metadata notes
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` at `bucket/key`, replacing any existing object
    ///
    /// # Errors
    /// * `ServiceError::Storage` - The write failed
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>)
        -> Result<(), ServiceError>;
}
