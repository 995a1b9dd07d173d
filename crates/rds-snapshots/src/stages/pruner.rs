//! Retention pruning
//!
//! Lists the instance's snapshots, computes each one's age in whole days and
//! deletes those older than the retention window:
//! - Age is `floor((now - created_at) / 1 day)` on the UTC timeline, so the
//!   offset a timestamp is annotated with never changes its age
//! - A snapshot is expired iff `age > retention_days`; age equal to the
//!   window is kept
//! - Deletes run one at a time in listing order; one failed delete does not
//!   stop the rest
//! - Snapshots without a creation time are skipped, never deleted

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use rds_snapshots_services::{ServiceError, SnapshotId, SnapshotRecord, SnapshotService};
use tracing::{debug, error, info, instrument, warn};

use super::StageError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Default retention window in days
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

/// How long snapshots are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub retention_days: u32,
}

impl RetentionPolicy {
    pub fn new(retention_days: u32) -> Self {
        Self { retention_days }
    }

    /// Whether a snapshot of this age has outlived the window
    pub fn is_expired(&self, age_in_days: i64) -> bool {
        age_in_days > i64::from(self.retention_days)
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION_DAYS)
    }
}

/// Whole days elapsed between `created_at` and `now`, rounded down
pub fn age_in_days(created_at: &DateTime<FixedOffset>, now: DateTime<Utc>) -> i64 {
    let elapsed = now.signed_duration_since(created_at.with_timezone(&Utc));
    elapsed.num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Decision for one listed snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Within the window
    Retain { age_in_days: i64 },
    /// Older than the window
    Expired { age_in_days: i64 },
    /// Age unknown (no creation time)
    Skip,
}

/// Classify one snapshot against the policy
pub fn evaluate(record: &SnapshotRecord, policy: RetentionPolicy, now: DateTime<Utc>) -> Verdict {
    match &record.created_at {
        None => Verdict::Skip,
        Some(created_at) => {
            let age = age_in_days(created_at, now);
            if policy.is_expired(age) {
                Verdict::Expired { age_in_days: age }
            } else {
                Verdict::Retain { age_in_days: age }
            }
        }
    }
}


/// What one pruning pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Snapshots in the listing
    pub examined: usize,
    /// Expired snapshots, whether or not a delete was attempted
    pub eligible: Vec<SnapshotId>,
    /// Successfully deleted
    pub deleted: Vec<SnapshotId>,
    /// Already gone when the delete arrived
    pub vanished: Vec<SnapshotId>,
    /// Delete attempts that failed, with the error message
    pub failed: Vec<(SnapshotId, String)>,
    /// Within the window
    pub retained: Vec<SnapshotId>,
    /// No creation time
    pub skipped: Vec<SnapshotId>,
    pub dry_run: bool,
}

impl PruneReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Deletes snapshots that have outlived the retention window
pub struct Pruner {
    snapshots: Arc<dyn SnapshotService>,
    instance_id: String,
    policy: RetentionPolicy,
    dry_run: bool,
}

impl Pruner {
    pub fn new(
        snapshots: Arc<dyn SnapshotService>,
        instance_id: impl Into<String>,
        policy: RetentionPolicy,
    ) -> Self {
        Self {
            snapshots,
            instance_id: instance_id.into(),
            policy,
            dry_run: false,
        }
    }

    /// Evaluate and log, but never call delete
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Prune against the current time
    ///
    /// # Errors
    ///
    /// Returns `StageError::Service` with a listing failure when snapshots
    /// could not be enumerated. Failed deletes are reported, not returned.
    pub async fn prune(&self) -> Result<PruneReport, StageError> {
        self.prune_at(Utc::now()).await
    }

    /// Prune as if the current time were `now`
    #[instrument(
        skip(self),
        fields(
            instance_id = %self.instance_id,
            retention_days = self.policy.retention_days,
            dry_run = self.dry_run
        )
    )]
    pub async fn prune_at(&self, now: DateTime<Utc>) -> Result<PruneReport, StageError> {
        let listing = self
            .snapshots
            .list_snapshots(&self.instance_id)
            .await
            .map_err(StageError::from)
            .inspect_err(|e| {
                error!(kind = e.kind(), error = %e, "Error listing snapshots; nothing pruned")
            })?;

        let mut report = PruneReport {
            examined: listing.len(),
            dry_run: self.dry_run,
            ..Default::default()
        };

        for record in listing {
            let snapshot_id = record.snapshot_id.clone();
            match evaluate(&record, self.policy, now) {
                Verdict::Skip => {
                    warn!(snapshot_id = %snapshot_id, "Snapshot has no creation time; skipping");
                    report.skipped.push(snapshot_id);
                }
                Verdict::Retain { age_in_days } => {
                    debug!(snapshot_id = %snapshot_id, age_in_days, "Keeping snapshot");
                    report.retained.push(snapshot_id);
                }
                Verdict::Expired { age_in_days } => {
                    report.eligible.push(snapshot_id.clone());
                    if self.dry_run {
                        info!(snapshot_id = %snapshot_id, age_in_days, "Would delete old snapshot");
                        continue;
                    }
                    self.delete_one(snapshot_id, age_in_days, &mut report).await;
                }
            }
        }

        info!(
            examined = report.examined,
            eligible = report.eligible.len(),
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "Retention pass finished"
        );
        Ok(report)
    }

    async fn delete_one(&self, snapshot_id: SnapshotId, age_in_days: i64, report: &mut PruneReport) {
        info!(snapshot_id = %snapshot_id, age_in_days, "Deleting old snapshot");

        match self.snapshots.delete_snapshot(&snapshot_id).await {
            Ok(()) => {
                info!(snapshot_id = %snapshot_id, "Deleted snapshot");
                report.deleted.push(snapshot_id);
            }
            Err(ServiceError::NotFound { .. }) => {
                warn!(snapshot_id = %snapshot_id, "Snapshot already gone");
                report.vanished.push(snapshot_id);
            }
            Err(e) => {
                error!(
                    snapshot_id = %snapshot_id,
                    kind = e.kind(),
                    error = %e,
                    "Error deleting snapshot (continuing)"
                );
                report.failed.push((snapshot_id, e.to_string()));
            }
        }
    }
}
