//! Snapshot requester

use std::sync::Arc;

use rds_snapshots_services::{SnapshotId, SnapshotService};
use tracing::{error, info, instrument};

use super::StageError;
use crate::identifier::SnapshotIdGenerator;

/// Starts a new snapshot of the managed instance
pub struct Requester {
    snapshots: Arc<dyn SnapshotService>,
    instance_id: String,
    ids: SnapshotIdGenerator,
}

impl Requester {
    pub fn new(
        snapshots: Arc<dyn SnapshotService>,
        instance_id: impl Into<String>,
        ids: SnapshotIdGenerator,
    ) -> Self {
        Self {
            snapshots,
            instance_id: instance_id.into(),
            ids,
        }
    }

    /// Generate a fresh identifier and request the snapshot
    ///
    /// Returns the identifier the service accepted. There are no retries.
    ///
    /// # Errors
    ///
    /// Returns `StageError::Identifier` if no valid identifier could be
    /// generated and `StageError::Service` if the service rejected the request.
    pub async fn request(&self) -> Result<SnapshotId, StageError> {
        let snapshot_id = self
            .ids
            .generate()
            .map_err(StageError::from)
            .inspect_err(|e| {
                error!(kind = e.kind(), error = %e, "Error generating snapshot identifier")
            })?;
        self.request_with_id(snapshot_id).await
    }

    /// Request a snapshot under a caller-chosen identifier
    #[instrument(skip(self, snapshot_id), fields(instance_id = %self.instance_id, snapshot_id = %snapshot_id))]
    pub async fn request_with_id(&self, snapshot_id: SnapshotId) -> Result<SnapshotId, StageError> {
        info!("Creating snapshot");

        let accepted = self
            .snapshots
            .create_snapshot(&self.instance_id, &snapshot_id)
            .await
            .map_err(StageError::from)
            .inspect_err(|e| error!(kind = e.kind(), error = %e, "Error creating snapshot"))?;

        info!(accepted = %accepted, "Snapshot creation started");
        Ok(accepted)
    }
}
