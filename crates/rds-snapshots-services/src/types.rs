//! Domain types for the collaborator layer

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strongly-typed snapshot identifier
///
/// This newtype prevents accidentally passing an instance identifier, bucket
/// name, or object key where a snapshot ID is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(String);

impl SnapshotId {
    /// Create a new SnapshotId from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SnapshotId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SnapshotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for SnapshotId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A snapshot as reported by the database service's listing call
///
/// `created_at` keeps the offset the service annotated the timestamp with.
/// It is `None` while the service has not yet stamped the snapshot (for
/// example when creation is still pending), or when the reported value
/// could not be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub snapshot_id: SnapshotId,
    pub created_at: Option<DateTime<FixedOffset>>,
}

impl SnapshotRecord {
    pub fn new(snapshot_id: impl Into<SnapshotId>, created_at: DateTime<FixedOffset>) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            created_at: Some(created_at),
        }
    }

    /// Record without a creation timestamp
    pub fn pending(snapshot_id: impl Into<SnapshotId>) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            created_at: None,
        }
    }

    /// Build a record from a UTC timestamp
    pub fn from_utc(snapshot_id: impl Into<SnapshotId>, created_at: DateTime<Utc>) -> Self {
        Self::new(snapshot_id, created_at.fixed_offset())
    }
}

/// Plain-text note written next to each snapshot
///
/// Rendered as two lines, `Snapshot ID: <id>` and `Created at: <timestamp>`,
/// and stored under `<id>.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub snapshot_id: SnapshotId,
    pub written_at: DateTime<Utc>,
}

impl MetadataRecord {
    pub const KEY_SUFFIX: &'static str = ".txt";

    pub fn new(snapshot_id: SnapshotId, written_at: DateTime<Utc>) -> Self {
        Self {
            snapshot_id,
            written_at,
        }
    }

    /// Object key for this record, with an optional key prefix
    pub fn object_key(&self, key_prefix: &str) -> String {
        format!("{}{}{}", key_prefix, self.snapshot_id, Self::KEY_SUFFIX)
    }

    /// Text body of the record
    pub fn body(&self) -> String {
        format!(
            "Snapshot ID: {}\nCreated at: {}\n",
            self.snapshot_id,
            self.written_at.format("%Y-%m-%d %H:%M:%S%.6f")
        )
    }
}
