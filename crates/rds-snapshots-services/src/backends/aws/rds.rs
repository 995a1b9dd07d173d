//! RDS snapshot service
//!
//! - Create manual DB snapshots
//! - List manual snapshots of one instance (all pages)
//! - Delete snapshots by identifier

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_rds::error::DisplayErrorContext;
use aws_sdk_rds::types::DbSnapshot;
use aws_sdk_rds::Client;
use tracing::{debug, instrument, warn};

use crate::error::ServiceError;
use crate::traits::SnapshotService;
use crate::types::{SnapshotId, SnapshotRecord};

/// Automated snapshots are owned by the RDS backup window and cannot be
/// deleted by callers, so only manual ones are listed.
const LISTED_SNAPSHOT_TYPE: &str = "manual";

/// `SnapshotService` backed by the RDS API
#[derive(Debug, Clone)]
pub struct RdsSnapshotService {
    client: Client,
}

impl RdsSnapshotService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

/// Convert one listed snapshot into a record
///
/// Returns `None` when the service omitted the identifier.
fn to_record(snapshot: &DbSnapshot) -> Option<SnapshotRecord> {
    let snapshot_id = SnapshotId::new(snapshot.db_snapshot_identifier()?);

    let created_at = snapshot.snapshot_create_time().and_then(|t| {
        let converted = chrono::DateTime::from_timestamp(t.secs(), t.subsec_nanos());
        if converted.is_none() {
            warn!(
                snapshot_id = %snapshot_id,
                secs = t.secs(),
                "Snapshot creation time out of range"
            );
        }
        converted
    });

    Some(SnapshotRecord {
        snapshot_id,
        created_at: created_at.map(|t| t.fixed_offset()),
    })
}

#[async_trait]
impl SnapshotService for RdsSnapshotService {
    #[instrument(skip(self, snapshot_id), fields(snapshot_id = %snapshot_id))]
    async fn create_snapshot(
        &self,
        instance_id: &str,
        snapshot_id: &SnapshotId,
    ) -> Result<SnapshotId, ServiceError> {
        let output = self
            .client
            .create_db_snapshot()
            .db_instance_identifier(instance_id)
            .db_snapshot_identifier(snapshot_id.as_str())
            .send()
            .await
            .map_err(|e| {
                let message = format!("CreateDBSnapshot: {}", DisplayErrorContext(&e));
                ServiceError::request(message, e)
            })?;

        let snapshot = output.db_snapshot().ok_or_else(|| {
            ServiceError::InvalidData("CreateDBSnapshot response has no snapshot".into())
        })?;
        let accepted = snapshot.db_snapshot_identifier().ok_or_else(|| {
            ServiceError::InvalidData("CreateDBSnapshot response has no snapshot identifier".into())
        })?;

        debug!(status = ?snapshot.status(), "Snapshot creation accepted");
        Ok(SnapshotId::new(accepted))
    }

    #[instrument(skip(self))]
    async fn list_snapshots(&self, instance_id: &str) -> Result<Vec<SnapshotRecord>, ServiceError> {
        let mut pages = self
            .client
            .describe_db_snapshots()
            .db_instance_identifier(instance_id)
            .snapshot_type(LISTED_SNAPSHOT_TYPE)
            .into_paginator()
            .send();

        let mut records = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                let message = format!("DescribeDBSnapshots: {}", DisplayErrorContext(&e));
                ServiceError::listing(message, e)
            })?;

            for snapshot in page.db_snapshots() {
                match to_record(snapshot) {
                    Some(record) => records.push(record),
                    None => warn!("Ignoring listed snapshot without identifier"),
                }
            }
        }

        debug!(count = records.len(), "Listed snapshots");
        Ok(records)
    }

    #[instrument(skip(self, snapshot_id), fields(snapshot_id = %snapshot_id))]
    async fn delete_snapshot(&self, snapshot_id: &SnapshotId) -> Result<(), ServiceError> {
        self.client
            .delete_db_snapshot()
            .db_snapshot_identifier(snapshot_id.as_str())
            .send()
            .await
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .is_some_and(|se| se.is_db_snapshot_not_found_fault());
                if not_found {
                    return ServiceError::NotFound {
                        entity_type: "snapshot",
                        id: snapshot_id.to_string(),
                    };
                }
                let message = format!("DeleteDBSnapshot: {}", DisplayErrorContext(&e));
                ServiceError::delete(snapshot_id.as_str(), message, e)
            })?;

        Ok(())
    }
}
