//! Run configuration
//!
//! Values are resolved with precedence CLI > env > file > defaults. Clap
//! already folds the environment into the CLI values it hands over as
//! [`Overrides`], so this module only layers those on top of the TOML file.
//!
//! ```toml
//! [database]
//! instance_id = "prod-db"
//! snapshot_prefix = "rds-snapshot-"
//!
//! [metadata]
//! bucket = "prod-db-snapshot-notes"
//!
//! [retention]
//! days = 7
//!
//! [service]
//! url = "aws://us-east-1"
//! ```

use rds_snapshots_services::BackendConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::identifier::{validate_prefix, IdentifierError};
use crate::stages::DEFAULT_RETENTION_DAYS;

/// Location read when no config path is given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/rds-snapshots/config.toml";

pub const DEFAULT_SNAPSHOT_PREFIX: &str = "rds-snapshot-";

/// One hundred years
pub const MAX_RETENTION_DAYS: u32 = 36_500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("instance_id is required: use --instance-id, RDS_SNAPSHOTS_INSTANCE_ID, or [database] instance_id")]
    MissingInstanceId,

    #[error("bucket is required: use --bucket, RDS_SNAPSHOTS_BUCKET, or [metadata] bucket")]
    MissingBucket,

    #[error("retention days must be at most {max}, got {0}", max = MAX_RETENTION_DAYS)]
    RetentionOutOfRange(u32),

    #[error(transparent)]
    Prefix(#[from] IdentifierError),

    #[error("Service configuration error: {0}")]
    Service(#[from] rds_snapshots_services::ConfigError),
}

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    database: DatabaseSection,
    #[serde(default)]
    metadata: MetadataSection,
    #[serde(default)]
    retention: RetentionSection,
    #[serde(default)]
    service: ServiceSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatabaseSection {
    instance_id: Option<String>,
    snapshot_prefix: Option<String>,
    unique_suffix: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MetadataSection {
    bucket: Option<String>,
    key_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RetentionSection {
    days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServiceSection {
    url: Option<String>,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub instance_id: Option<String>,
    pub bucket_name: Option<String>,
    pub snapshot_prefix: Option<String>,
    pub retention_days: Option<u32>,
    pub service_url: Option<String>,
    pub unique_suffix: Option<bool>,
    pub key_prefix: Option<String>,
}

/// Fully resolved and validated configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub instance_id: String,
    pub bucket_name: String,
    pub snapshot_prefix: String,
    pub unique_suffix: bool,
    /// Prepended to `<id>.txt`; empty by default
    pub metadata_key_prefix: String,
    pub retention_days: u32,
    pub backend: BackendConfig,
}

impl Config {
    /// Load configuration with precedence: overrides > file > defaults
    ///
    /// Without an explicit path the default location is read if it exists.
    /// An explicit path must exist.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Some(Self::read_file(path)?),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Some(Self::read_file(default)?)
                } else {
                    None
                }
            }
        };

        Self::resolve(file.unwrap_or_default(), overrides)
    }

    /// Parse a TOML document and layer overrides on top
    pub fn from_toml(content: &str, overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::resolve(toml::from_str(content)?, overrides)
    }

    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn resolve(file: ConfigFile, overrides: &Overrides) -> Result<Self, ConfigError> {
        let instance_id = overrides
            .instance_id
            .clone()
            .or(file.database.instance_id)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingInstanceId)?;

        let bucket_name = overrides
            .bucket_name
            .clone()
            .or(file.metadata.bucket)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingBucket)?;

        let snapshot_prefix = overrides
            .snapshot_prefix
            .clone()
            .or(file.database.snapshot_prefix)
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_PREFIX.to_string());
        validate_prefix(&snapshot_prefix)?;

        let retention_days = overrides
            .retention_days
            .or(file.retention.days)
            .unwrap_or(DEFAULT_RETENTION_DAYS);
        if retention_days > MAX_RETENTION_DAYS {
            return Err(ConfigError::RetentionOutOfRange(retention_days));
        }

        let backend = match overrides.service_url.as_deref().or(file.service.url.as_deref()) {
            Some(url) => BackendConfig::from_url(url)?,
            None => BackendConfig::default(),
        };

        Ok(Self {
            instance_id,
            bucket_name,
            snapshot_prefix,
            unique_suffix: overrides
                .unique_suffix
                .or(file.database.unique_suffix)
                .unwrap_or(true),
            metadata_key_prefix: overrides
                .key_prefix
                .clone()
                .or(file.metadata.key_prefix)
                .unwrap_or_default(),
            retention_days,
            backend,
        })
    }
}
