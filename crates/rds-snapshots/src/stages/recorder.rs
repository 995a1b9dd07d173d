//! Metadata recorder

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rds_snapshots_services::{MetadataRecord, ObjectStore, SnapshotId};
use tracing::{error, info, instrument};

use super::StageError;

/// Writes a two-line note about a snapshot to the metadata bucket
pub struct Recorder {
    objects: Arc<dyn ObjectStore>,
    bucket: String,
    key_prefix: String,
}

impl Recorder {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            objects,
            bucket: bucket.into(),
            key_prefix: key_prefix.into(),
        }
    }

    /// Record the snapshot, stamped with the current time
    ///
    /// Returns the object key written. Re-recording the same snapshot
    /// overwrites the same key.
    ///
    /// # Errors
    ///
    /// Returns `StageError::Service` with a storage failure if the write failed.
    pub async fn record(&self, snapshot_id: &SnapshotId) -> Result<String, StageError> {
        self.record_at(snapshot_id, Utc::now()).await
    }

    /// Record the snapshot, stamped with `written_at`
    #[instrument(skip(self, snapshot_id), fields(bucket = %self.bucket, snapshot_id = %snapshot_id))]
    pub async fn record_at(
        &self,
        snapshot_id: &SnapshotId,
        written_at: DateTime<Utc>,
    ) -> Result<String, StageError> {
        let record = MetadataRecord::new(snapshot_id.clone(), written_at);
        let key = record.object_key(&self.key_prefix);

        info!(key = %key, "Uploading snapshot metadata");
        self.objects
            .put_object(&self.bucket, &key, record.body().into_bytes())
            .await
            .map_err(StageError::from)
            .inspect_err(|e| {
                error!(key = %key, kind = e.kind(), error = %e, "Error uploading snapshot metadata")
            })?;

        info!(key = %key, "Snapshot metadata uploaded");
        Ok(key)
    }
}
