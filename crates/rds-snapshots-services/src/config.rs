//! Backend configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing backend configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid URL format
    #[error("Invalid URL format: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Unsupported URL scheme
    #[error("Unsupported URL scheme: {0}. Supported schemes: aws, memory")]
    UnsupportedScheme(String),

    /// Endpoint override is not an absolute http(s) URL
    #[error("Invalid endpoint override: {0}")]
    InvalidEndpoint(String),
}

/// Service backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// RDS snapshots and S3 metadata via the AWS SDK
    Aws,
    /// Process-local services (testing and local trials)
    Memory,
}

/// Backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend type
    pub backend: BackendType,

    /// Region override (AWS only); the SDK's provider chain decides when unset
    pub region: Option<String>,

    /// Endpoint override (AWS only), e.g. a LocalStack URL
    pub endpoint_url: Option<String>,
}

impl BackendConfig {
    /// Parse a service URL into backend configuration
    ///
    /// Supported URL formats:
    /// - `aws://` - AWS with region from the default provider chain
    /// - `aws://us-east-1` - AWS in an explicit region
    /// - `aws://us-east-1?endpoint=http://localhost:4566` - AWS API-compatible endpoint
    /// - `memory://` - In-memory services
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the URL cannot be parsed.
    /// Returns `ConfigError::UnsupportedScheme` if the URL scheme is not supported.
    /// Returns `ConfigError::InvalidEndpoint` if the endpoint parameter is not http(s).
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        // Bare `scheme://` has nothing for the parser to validate
        if let Some(scheme) = url.strip_suffix("://") {
            return Self::for_scheme(scheme);
        }

        let parsed = url::Url::parse(url)?;
        let mut config = Self::for_scheme(parsed.scheme())?;
        if config.backend == BackendType::Memory {
            return Ok(config);
        }

        config.region = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .map(String::from);

        config.endpoint_url = parsed
            .query_pairs()
            .find(|(key, _)| key == "endpoint")
            .map(|(_, value)| {
                let endpoint = url::Url::parse(&value)
                    .map_err(|_| ConfigError::InvalidEndpoint(value.to_string()))?;
                match endpoint.scheme() {
                    "http" | "https" => Ok(value.to_string()),
                    _ => Err(ConfigError::InvalidEndpoint(value.to_string())),
                }
            })
            .transpose()?;

        Ok(config)
    }

    fn for_scheme(scheme: &str) -> Result<Self, ConfigError> {
        match scheme {
            "aws" => Ok(Self::aws_default()),
            "memory" => Ok(Self::memory()),
            scheme => Err(ConfigError::UnsupportedScheme(scheme.to_string())),
        }
    }

    /// AWS configuration resolved entirely from the SDK's provider chain
    #[must_use]
    pub fn aws_default() -> Self {
        Self {
            backend: BackendType::Aws,
            region: None,
            endpoint_url: None,
        }
    }

    /// In-memory configuration for testing
    #[must_use]
    pub fn memory() -> Self {
        Self {
            backend: BackendType::Memory,
            region: None,
            endpoint_url: None,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::aws_default()
    }
}
