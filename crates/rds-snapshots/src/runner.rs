//! Run orchestration
//!
//! A run is always the same linear sequence:
//!
//! 1. request a snapshot
//! 2. record its metadata, only if step 1 produced an identifier
//! 3. prune expired snapshots, always, whatever happened in steps 1-2
//!
//! No stage failure aborts the sequence. Outcomes are collected in a
//! [`RunReport`]; callers decide what a failure means for the exit code.

use rds_snapshots_services::{Services, SnapshotId};
use tracing::{info, warn};

use crate::config::Config;
use crate::identifier::{IdentifierError, SnapshotIdGenerator};
use crate::stages::{PruneReport, Pruner, Recorder, Requester, RetentionPolicy, StageError};

/// Outcome of one stage
#[derive(Debug)]
pub enum StageStatus<T> {
    Completed(T),
    Failed(StageError),
    Skipped(&'static str),
}

impl<T> StageStatus<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, StageStatus::Failed(_))
    }

    pub fn completed(&self) -> Option<&T> {
        match self {
            StageStatus::Completed(value) => Some(value),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            StageStatus::Completed(_) => "completed",
            StageStatus::Failed(_) => "failed",
            StageStatus::Skipped(_) => "skipped",
        }
    }
}

impl<T> From<Result<T, StageError>> for StageStatus<T> {
    fn from(result: Result<T, StageError>) -> Self {
        match result {
            Ok(value) => StageStatus::Completed(value),
            Err(e) => StageStatus::Failed(e),
        }
    }
}

/// Everything a run did
#[derive(Debug)]
pub struct RunReport {
    /// Identifier of the snapshot that was started
    pub requested: StageStatus<SnapshotId>,
    /// Object key of the metadata note
    pub recorded: StageStatus<String>,
    pub pruned: StageStatus<PruneReport>,
}

impl RunReport {
    /// Any stage failed, or any individual delete failed
    pub fn has_failures(&self) -> bool {
        self.requested.is_failed()
            || self.recorded.is_failed()
            || self.pruned.is_failed()
            || self
                .pruned
                .completed()
                .is_some_and(PruneReport::has_failures)
    }

    /// One summary line at the end of a run
    pub fn log_summary(&self) {
        let request = self.requested.label();
        let record = self.recorded.label();
        let prune = self.pruned.label();
        let counts = PruneCounts::from(self.pruned.completed());

        if self.has_failures() {
            warn!(
                request,
                record,
                prune,
                deleted = counts.deleted,
                vanished = counts.vanished,
                skipped = counts.skipped,
                delete_failures = counts.failed,
                "Run finished with failures"
            );
        } else {
            info!(
                request,
                record,
                prune,
                deleted = counts.deleted,
                vanished = counts.vanished,
                skipped = counts.skipped,
                "Run finished"
            );
        }
    }
}

/// Per-outcome totals of a pruning pass; all zero when pruning did not complete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneCounts {
    pub deleted: usize,
    pub vanished: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl From<Option<&PruneReport>> for PruneCounts {
    fn from(report: Option<&PruneReport>) -> Self {
        report.map_or_else(Self::default, |r| Self {
            deleted: r.deleted.len(),
            vanished: r.vanished.len(),
            skipped: r.skipped.len(),
            failed: r.failed.len(),
        })
    }
}

/// Options that change what a run does, not where it does it
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// List and evaluate only: no create, no metadata write, no delete
    pub dry_run: bool,
}

/// Wires the three stages together
pub struct Runner {
    requester: Requester,
    recorder: Recorder,
    pruner: Pruner,
    options: RunOptions,
}

impl Runner {
    pub fn new(requester: Requester, recorder: Recorder, pruner: Pruner, options: RunOptions) -> Self {
        Self {
            requester,
            recorder,
            pruner: pruner.dry_run(options.dry_run),
            options,
        }
    }

    /// Build all stages from configuration and collaborators
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::InvalidPrefix` if the configured prefix is unusable.
    pub fn from_config(
        config: &Config,
        services: Services,
        options: RunOptions,
    ) -> Result<Self, IdentifierError> {
        let ids = SnapshotIdGenerator::new(&config.snapshot_prefix, config.unique_suffix)?;

        let requester = Requester::new(services.snapshots.clone(), &config.instance_id, ids);
        let recorder = Recorder::new(
            services.objects,
            &config.bucket_name,
            &config.metadata_key_prefix,
        );
        let pruner = Pruner::new(
            services.snapshots,
            &config.instance_id,
            RetentionPolicy::new(config.retention_days),
        );

        Ok(Self::new(requester, recorder, pruner, options))
    }

    /// Run the whole sequence; never fails
    pub async fn run(&self) -> RunReport {
        if self.options.dry_run {
            info!("Dry run: skipping snapshot creation and metadata upload");
            return RunReport {
                requested: StageStatus::Skipped("dry run"),
                recorded: StageStatus::Skipped("dry run"),
                pruned: self.pruner.prune().await.into(),
            };
        }

        let requested: StageStatus<SnapshotId> = self.requester.request().await.into();

        let recorded = match requested.completed() {
            Some(snapshot_id) => self.recorder.record(snapshot_id).await.into(),
            None => StageStatus::Skipped("no snapshot identifier"),
        };

        // Pruning is independent of the outcome of the stages above
        let pruned = self.pruner.prune().await.into();

        RunReport {
            requested,
            recorded,
            pruned,
        }
    }
}
