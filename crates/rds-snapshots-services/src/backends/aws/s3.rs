//! S3 object store for metadata notes

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, instrument};

use crate::error::ServiceError;
use crate::traits::ObjectStore;

const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// `ObjectStore` backed by S3
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from shared SDK configuration
    ///
    /// `force_path_style` addresses buckets as `endpoint/bucket/key`
    /// instead of `bucket.endpoint/key`.
    pub fn from_sdk_config(sdk_config: &SdkConfig, force_path_style: bool) -> Self {
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(force_path_style)
            .build();
        Self::new(Client::from_conf(s3_config))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), ServiceError> {
        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(CONTENT_TYPE)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                let message = format!("PutObject s3://{}/{}: {}", bucket, key, DisplayErrorContext(&e));
                ServiceError::storage(message, e)
            })?;

        debug!(etag = ?output.e_tag(), "Object written");
        Ok(())
    }
}
