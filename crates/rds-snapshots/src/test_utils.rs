//! Test utilities for rds-snapshots tests.
//!
//! Provides common setup functions to reduce duplication across test modules.

use chrono::{DateTime, Duration, Utc};
use rds_snapshots_services::backends::memory::MemoryServices;
use rds_snapshots_services::{BackendConfig, Services, SnapshotRecord};

use crate::config::Config;

pub const TEST_INSTANCE: &str = "prod-db";
pub const TEST_BUCKET: &str = "snapshot-notes";

/// Creates a default test configuration backed by the in-memory services.
///
/// Identifiers carry no random suffix so tests can predict them.
pub fn create_test_config() -> Config {
    Config {
        instance_id: TEST_INSTANCE.to_string(),
        bucket_name: TEST_BUCKET.to_string(),
        snapshot_prefix: "rds-snapshot-".to_string(),
        unique_suffix: false,
        metadata_key_prefix: String::new(),
        retention_days: 7,
        backend: BackendConfig::memory(),
    }
}

/// Creates an in-memory backend and the services view over it.
///
/// The returned backend shares state with the services, so tests can seed
/// and inspect it after handing the services to a runner.
pub fn create_test_services() -> (MemoryServices, Services) {
    let backend = MemoryServices::new();
    let services = Services::in_memory(backend.clone());
    (backend, services)
}

/// A listed snapshot created `age` before `now`
pub fn aged_snapshot(id: &str, now: DateTime<Utc>, age: Duration) -> SnapshotRecord {
    SnapshotRecord::from_utc(id, now - age)
}
