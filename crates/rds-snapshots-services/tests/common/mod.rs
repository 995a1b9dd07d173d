//! Shared test harness for service backends
//!
//! This module provides generic test functions that verify correct
//! implementation of the collaborator traits. Every backend must pass
//! these tests so the snapshot workflow behaves the same on all of them.
//!
//! # Usage
//!
//! ```ignore
//! use rds_snapshots_services::backends::memory::MemoryServices;
//!
//! #[tokio::test]
//! async fn memory_passes_all_tests() {
//!     let services = MemoryServices::new();
//!     common::run_all_tests(&services).await;
//! }
//! ```
//!
//! # Adding Tests for New Backends
//!
//! 1. Create a new test file (e.g., `tests/localstack_backend.rs`)
//! 2. Construct your backend
//! 3. Call `run_all_tests(&backend).await` or individual test runners
//!
//! Tests use unique identifiers per call so they can share one backend.

pub mod object_store_tests;
pub mod snapshot_service_tests;

use rds_snapshots_services::{ObjectStore, SnapshotService};

/// Run all collaborator trait tests
pub async fn run_all_tests<B: SnapshotService + ObjectStore>(backend: &B) {
    println!("Running SnapshotService tests...");
    snapshot_service_tests::run_all(backend).await;

    println!("Running ObjectStore tests...");
    object_store_tests::run_all(backend).await;

    println!("All service tests passed!");
}

/// Run only SnapshotService trait tests
#[allow(dead_code)]
pub async fn run_snapshot_service_tests<S: SnapshotService>(service: &S) {
    snapshot_service_tests::run_all(service).await;
}

/// Run only ObjectStore trait tests
#[allow(dead_code)]
pub async fn run_object_store_tests<O: ObjectStore>(store: &O) {
    object_store_tests::run_all(store).await;
}
