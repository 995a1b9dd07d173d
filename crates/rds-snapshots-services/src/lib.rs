//! External collaborators for rds-snapshots
//!
//! Provides backend-agnostic traits for the two services the snapshot
//! workflow depends on, plus implementations of them.
//!
//! # Supported Backends
//!
//! - **AWS** (feature: `aws`, default) - RDS snapshots, S3 metadata notes
//! - **Memory** - Process-local doubles with failure injection
//!
//! # Architecture
//!
//! All backends implement the same traits:
//! - [`SnapshotService`] - Create, list and delete database snapshots
//! - [`ObjectStore`] - Write metadata objects
//!
//! # Examples
//!
//! ```no_run
//! use rds_snapshots_services::{create_services, BackendConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackendConfig::from_url("aws://us-east-1")?;
//! let services = create_services(&config).await?;
//! let listed = services.snapshots.list_snapshots("prod-db").await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod traits;
mod types;

pub mod backends;

// Re-exports
pub use config::{BackendConfig, BackendType, ConfigError};
pub use error::{BoxedError, ServiceError};
pub use traits::{ObjectStore, SnapshotService};
#[cfg(any(test, feature = "mock"))]
pub use traits::{MockObjectStore, MockSnapshotService};
pub use types::{MetadataRecord, SnapshotId, SnapshotRecord};

use std::sync::Arc;

/// The pair of collaborators a run needs
#[derive(Clone)]
pub struct Services {
    pub snapshots: Arc<dyn SnapshotService>,
    pub objects: Arc<dyn ObjectStore>,
}

impl Services {
    pub fn new(snapshots: Arc<dyn SnapshotService>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { snapshots, objects }
    }

    /// Both collaborators served by one in-memory backend
    pub fn in_memory(backend: backends::memory::MemoryServices) -> Self {
        let backend = Arc::new(backend);
        Self {
            snapshots: backend.clone(),
            objects: backend,
        }
    }
}

/// Create collaborators from configuration
///
/// This is the primary entry point for building service clients.
///
/// # Errors
///
/// Returns `ConfigError::UnsupportedScheme` if the backend type is not
/// compiled in (missing feature flag).
pub async fn create_services(config: &BackendConfig) -> Result<Services, ConfigError> {
    let services = match config.backend {
        #[cfg(feature = "aws")]
        BackendType::Aws => {
            let (snapshots, objects) = backends::aws::connect(config).await;
            Services::new(Arc::new(snapshots), Arc::new(objects))
        }
        #[cfg(not(feature = "aws"))]
        BackendType::Aws => {
            return Err(ConfigError::UnsupportedScheme(
                "aws (backend not compiled in, enable 'aws' feature)".into(),
            ))
        }
        BackendType::Memory => Services::in_memory(backends::memory::MemoryServices::new()),
    };

    tracing::debug!(backend = ?config.backend, "Services created");
    Ok(services)
}
