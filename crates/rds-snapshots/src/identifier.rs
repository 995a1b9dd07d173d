//! Snapshot identifier generation and validation
//!
//! Identifiers look like `<prefix><YYYY-MM-DD-HH-MM-SS>` followed, unless
//! disabled, by `-<6 random chars>` so two runs inside the same second do
//! not collide. Every generated identifier is checked against the RDS
//! naming rules before it is sent anywhere.

use chrono::{Local, NaiveDateTime};
use rds_snapshots_services::SnapshotId;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use ulid::Ulid;

/// Timestamp portion of a snapshot identifier
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Maximum identifier length accepted by RDS
pub const MAX_IDENTIFIER_LEN: usize = 255;

const SUFFIX_LEN: usize = 6;

// Letters, digits and hyphens, starting with a letter
static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Invalid snapshot prefix: {0}")]
    InvalidPrefix(String),

    #[error("Invalid snapshot identifier: {0}")]
    InvalidIdentifier(String),
}

pub type IdentifierResult<T> = Result<T, IdentifierError>;

/// Validates a snapshot identifier against RDS naming rules
/// Rules:
/// - 1-255 characters
/// - ASCII letters, digits and hyphens only
/// - First character must be a letter
/// - Cannot end with a hyphen or contain two consecutive hyphens
pub fn validate_snapshot_id(id: &str) -> IdentifierResult<()> {
    if id.is_empty() || id.len() > MAX_IDENTIFIER_LEN {
        return Err(IdentifierError::InvalidIdentifier(format!(
            "'{}' must be 1-{} characters",
            id, MAX_IDENTIFIER_LEN
        )));
    }

    if !IDENTIFIER_REGEX.is_match(id) {
        return Err(IdentifierError::InvalidIdentifier(format!(
            "'{}' must start with a letter and contain only letters, digits and hyphens",
            id
        )));
    }

    if id.ends_with('-') || id.contains("--") {
        return Err(IdentifierError::InvalidIdentifier(format!(
            "'{}' cannot end with a hyphen or contain consecutive hyphens",
            id
        )));
    }

    Ok(())
}

/// Validates a snapshot prefix
///
/// A prefix may end with a hyphen (the timestamp follows it), but otherwise
/// obeys the identifier rules and must leave room for the timestamp and suffix.
pub fn validate_prefix(prefix: &str) -> IdentifierResult<()> {
    let room = MAX_IDENTIFIER_LEN - "0000-00-00-00-00-00".len() - SUFFIX_LEN - 1;

    if prefix.is_empty() {
        return Err(IdentifierError::InvalidPrefix(
            "prefix cannot be empty".to_string(),
        ));
    }
    if prefix.len() > room {
        return Err(IdentifierError::InvalidPrefix(format!(
            "prefix exceeds maximum length of {} characters",
            room
        )));
    }
    if !IDENTIFIER_REGEX.is_match(prefix) || prefix.contains("--") {
        return Err(IdentifierError::InvalidPrefix(format!(
            "'{}' must start with a letter and contain only letters, digits and single hyphens",
            prefix
        )));
    }

    Ok(())
}

/// Produces identifiers for new snapshots
#[derive(Debug, Clone)]
pub struct SnapshotIdGenerator {
    prefix: String,
    unique_suffix: bool,
}

impl SnapshotIdGenerator {
    /// # Errors
    ///
    /// Returns `IdentifierError::InvalidPrefix` if the prefix would produce
    /// identifiers RDS rejects.
    pub fn new(prefix: impl Into<String>, unique_suffix: bool) -> IdentifierResult<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self {
            prefix,
            unique_suffix,
        })
    }

    /// Identifier stamped with the current local time
    pub fn generate(&self) -> IdentifierResult<SnapshotId> {
        self.generate_at(Local::now().naive_local())
    }

    /// Identifier stamped with `at`, truncated to whole seconds
    pub fn generate_at(&self, at: NaiveDateTime) -> IdentifierResult<SnapshotId> {
        let mut id = format!("{}{}", self.prefix, at.format(TIMESTAMP_FORMAT));
        if self.unique_suffix {
            id.push('-');
            id.push_str(&random_suffix());
        }

        validate_snapshot_id(&id)?;
        Ok(SnapshotId::new(id))
    }
}

/// Tail of a fresh ULID: random bits in lowercase Crockford base32
fn random_suffix() -> String {
    let ulid = Ulid::new().to_string().to_lowercase();
    ulid[ulid.len() - SUFFIX_LEN..].to_string()
}
