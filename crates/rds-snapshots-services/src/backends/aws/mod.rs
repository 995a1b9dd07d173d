//! AWS service backend
//!
//! Snapshots are managed through the RDS API and metadata notes are written
//! to S3. Both clients share one `SdkConfig`, so credentials and region come
//! from the standard AWS provider chain (environment, profile, IMDS, ...)
//! unless the backend configuration overrides them.
//!
//! # Examples
//!
//! ```no_run
//! use rds_snapshots_services::backends::aws;
//! use rds_snapshots_services::BackendConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackendConfig::from_url("aws://us-east-1")?;
//! let (snapshots, objects) = aws::connect(&config).await;
//! # Ok(())
//! # }
//! ```

use aws_config::{BehaviorVersion, SdkConfig};
use tracing::debug;

use crate::config::BackendConfig;

mod rds;
mod s3;

pub use rds::RdsSnapshotService;
pub use s3::S3ObjectStore;

/// Load the shared SDK configuration
pub async fn load_sdk_config(config: &BackendConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }
    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url.clone());
    }

    let sdk_config = loader.load().await;
    debug!(
        region = ?sdk_config.region().map(|r| r.to_string()),
        endpoint_override = config.endpoint_url.is_some(),
        "AWS SDK configuration loaded"
    );
    sdk_config
}

/// Build both AWS collaborators from one backend configuration
pub async fn connect(config: &BackendConfig) -> (RdsSnapshotService, S3ObjectStore) {
    let sdk_config = load_sdk_config(config).await;
    let snapshots = RdsSnapshotService::from_sdk_config(&sdk_config);
    // API-compatible stand-ins (LocalStack, MinIO) generally need path-style addressing
    let objects =
        S3ObjectStore::from_sdk_config(&sdk_config, config.endpoint_url.is_some());
    (snapshots, objects)
}
