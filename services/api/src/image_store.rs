//! Cover image storage
//!
//! Uploads go straight to the configured S3 bucket under a
//! collision-resistant key; the record keeps only the resulting public URL.
//! A single attempt per upload, no retry.

use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::{Client, primitives::ByteStream};
use uuid::Uuid;

/// Storage key for an uploaded cover image. A v4 UUID keeps concurrent
/// uploads of same-named files from colliding.
pub fn image_key(original_name: &str) -> String {
    format!("vinyl-covers/{}-{}", Uuid::new_v4(), original_name)
}

/// Object storage for cover images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the bytes under `key` with the given content type.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// The deterministic public URL for a stored key.
    fn public_url(&self, key: &str) -> String;
}

/// S3-backed image store
#[derive(Clone)]
pub struct S3ImageStore {
    client: Client,
    bucket: String,
    region: String,
}

impl S3ImageStore {
    pub fn new(client: Client, bucket: String, region: String) -> Self {
        Self {
            client,
            bucket,
            region,
        }
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket, self.region, key
        )
    }
}
