//! In-memory service backend
//!
//! Holds snapshots and objects in process memory. Every call is recorded
//! and each operation can be made to fail, which is what the contract and
//! scenario tests use it for. Clones share the same state.
//!
//! # Examples
//!
//! ```
//! use rds_snapshots_services::backends::memory::MemoryServices;
//! use rds_snapshots_services::{SnapshotId, SnapshotService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let services = MemoryServices::new();
//! services
//!     .create_snapshot("prod-db", &SnapshotId::new("rds-snapshot-2024-01-01-00-00-00"))
//!     .await?;
//! assert_eq!(services.list_snapshots("prod-db").await?.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::error::ServiceError;
use crate::traits::{ObjectStore, SnapshotService};
use crate::types::{SnapshotId, SnapshotRecord};

#[derive(Debug, Default)]
struct State {
    /// (instance id, record), in creation/insertion order
    snapshots: Vec<(String, SnapshotRecord)>,
    /// (bucket, key) -> body
    objects: BTreeMap<(String, String), Vec<u8>>,

    fail_create: bool,
    fail_listing: bool,
    fail_put: bool,
    fail_delete: HashSet<SnapshotId>,

    create_calls: Vec<SnapshotId>,
    delete_calls: Vec<SnapshotId>,
    put_calls: Vec<String>,
}

/// Process-local snapshot service and object store
#[derive(Debug, Clone, Default)]
pub struct MemoryServices {
    state: Arc<Mutex<State>>,
}

impl MemoryServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a snapshot as if the service already held it
    pub fn insert_snapshot(&self, instance_id: &str, record: SnapshotRecord) {
        self.state
            .lock()
            .snapshots
            .push((instance_id.to_string(), record));
    }

    /// Make every `create_snapshot` call fail
    pub fn fail_create(&self, fail: bool) {
        self.state.lock().fail_create = fail;
    }

    /// Make every `list_snapshots` call fail
    pub fn fail_listing(&self, fail: bool) {
        self.state.lock().fail_listing = fail;
    }

    /// Make every `put_object` call fail
    pub fn fail_put(&self, fail: bool) {
        self.state.lock().fail_put = fail;
    }

    /// Make deletes of this particular snapshot fail
    pub fn fail_delete_of(&self, snapshot_id: impl Into<SnapshotId>) {
        self.state.lock().fail_delete.insert(snapshot_id.into());
    }

    /// Identifiers of snapshots currently held for `instance_id`
    pub fn snapshot_ids(&self, instance_id: &str) -> Vec<SnapshotId> {
        self.state
            .lock()
            .snapshots
            .iter()
            .filter(|(instance, _)| instance == instance_id)
            .map(|(_, record)| record.snapshot_id.clone())
            .collect()
    }

    /// Stored object body, if any
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Every create attempt, in call order
    pub fn create_calls(&self) -> Vec<SnapshotId> {
        self.state.lock().create_calls.clone()
    }

    /// Every delete attempt, in call order (including failed ones)
    pub fn delete_calls(&self) -> Vec<SnapshotId> {
        self.state.lock().delete_calls.clone()
    }

    /// Every object key written or attempted, in call order
    pub fn put_calls(&self) -> Vec<String> {
        self.state.lock().put_calls.clone()
    }
}

#[async_trait]
impl SnapshotService for MemoryServices {
    async fn create_snapshot(
        &self,
        instance_id: &str,
        snapshot_id: &SnapshotId,
    ) -> Result<SnapshotId, ServiceError> {
        let mut state = self.state.lock();
        state.create_calls.push(snapshot_id.clone());

        if state.fail_create {
            return Err(ServiceError::Request {
                message: format!("injected failure creating {}", snapshot_id),
                source: None,
            });
        }

        if state
            .snapshots
            .iter()
            .any(|(_, record)| &record.snapshot_id == snapshot_id)
        {
            return Err(ServiceError::Request {
                message: format!("snapshot {} already exists", snapshot_id),
                source: None,
            });
        }

        state.snapshots.push((
            instance_id.to_string(),
            SnapshotRecord::from_utc(snapshot_id.clone(), Utc::now()),
        ));

        Ok(snapshot_id.clone())
    }

    async fn list_snapshots(&self, instance_id: &str) -> Result<Vec<SnapshotRecord>, ServiceError> {
        let state = self.state.lock();

        if state.fail_listing {
            return Err(ServiceError::Listing {
                message: format!("injected failure listing {}", instance_id),
                source: None,
            });
        }

        Ok(state
            .snapshots
            .iter()
            .filter(|(instance, _)| instance == instance_id)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn delete_snapshot(&self, snapshot_id: &SnapshotId) -> Result<(), ServiceError> {
        let mut state = self.state.lock();
        state.delete_calls.push(snapshot_id.clone());

        if state.fail_delete.contains(snapshot_id) {
            return Err(ServiceError::Delete {
                snapshot_id: snapshot_id.to_string(),
                message: "injected failure".to_string(),
                source: None,
            });
        }

        let before = state.snapshots.len();
        state
            .snapshots
            .retain(|(_, record)| &record.snapshot_id != snapshot_id);

        if state.snapshots.len() == before {
            return Err(ServiceError::NotFound {
                entity_type: "snapshot",
                id: snapshot_id.to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryServices {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), ServiceError> {
        let mut state = self.state.lock();
        state.put_calls.push(key.to_string());

        if state.fail_put {
            return Err(ServiceError::Storage {
                message: format!("injected failure writing {}/{}", bucket, key),
                source: None,
            });
        }

        state
            .objects
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }
}
