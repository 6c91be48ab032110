use async_trait::async_trait;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue};
use s3::creds::Credentials;
use s3::{Bucket, Region};
use std::time::Duration;

use crate::core::error::{ConfigError, Error};

/// Issues time-limited URLs so clients move bytes directly to and from a
/// bucket instead of through this service.
#[async_trait]
pub(crate) trait ObjectStorage: Send + Sync + std::fmt::Debug {
    fn bucket(&self) -> &str;

    /// The signed URL only accepts a PUT carrying exactly `content_type`.
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, Error>;

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, Error>;
}

#[derive(Clone, Debug)]
pub(crate) struct S3Storage {
    bucket: Box<Bucket>,
}

impl S3Storage {
    pub(crate) fn new(
        credentials: Credentials,
        region: &str,
        bucket: &str,
    ) -> Result<Self, ConfigError> {
        let region = Region::Custom {
            region: region.to_owned(),
            endpoint: format!("https://s3.{}.amazonaws.com", region),
        };

        Ok(Self {
            bucket: Bucket::new(bucket, region, credentials)?,
        })
    }
}

fn expiry_secs(expires_in: Duration) -> u32 {
    u32::try_from(expires_in.as_secs()).unwrap_or(u32::MAX)
}

#[async_trait]
impl ObjectStorage for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket.name
    }

    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(content_type)
                .map_err(|_| Error::Validation("Invalid content_type".into()))?,
        );

        let url = self
            .bucket
            .presign_put(format!("/{}", key), expiry_secs(expires_in), Some(headers), None)
            .await?;

        Ok(url)
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, Error> {
        let url = self
            .bucket
            .presign_get(format!("/{}", key), expiry_secs(expires_in), None)
            .await?;

        Ok(url)
    }
}
