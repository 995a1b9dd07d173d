//! Service backend implementations
//!
//! This module contains implementations of the collaborator traits:
//! - `aws` (feature `aws`, default): RDS snapshots and S3 metadata
//! - `memory`: process-local doubles with failure injection

#[cfg(feature = "aws")]
pub mod aws;

pub mod memory;
