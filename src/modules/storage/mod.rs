//! Photo storage module
//!
//! MinIO/S3-compatible client for hosting report evidence photos behind
//! durable public URLs.

use async_trait::async_trait;

use crate::core::error::Result;

mod minio_client;

pub use minio_client::MinIOClient;

/// Image hosting seam. Unlike classification, upload failures ARE surfaced:
/// a report must never be created without its evidence photo.
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Store raw image bytes under the given key prefix and return a durable
    /// retrieval URL.
    async fn upload_photo(&self, data: Vec<u8>, content_type: &str, prefix: &str)
        -> Result<String>;
}
