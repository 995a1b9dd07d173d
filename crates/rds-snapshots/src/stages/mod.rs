//! The three stages of a run
//!
//! - `requester`: start a new snapshot
//! - `recorder`: write the snapshot's metadata note
//! - `pruner`: delete snapshots past the retention window
//!
//! Each stage returns a typed result; none of them decides whether the run
//! continues. That is the orchestrator's job (see `runner`).

pub mod pruner;
pub mod recorder;
pub mod requester;

pub use pruner::{PruneReport, Pruner, RetentionPolicy, DEFAULT_RETENTION_DAYS};
pub use recorder::Recorder;
pub use requester::Requester;

use rds_snapshots_services::ServiceError;
use thiserror::Error;

use crate::identifier::IdentifierError;

#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl StageError {
    /// Short, stable name of the failure kind for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            StageError::Identifier(_) => "identifier",
            StageError::Service(e) => e.kind(),
        }
    }
}
