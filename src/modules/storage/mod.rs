//! Object storage for portfolio images
//!
//! `FileStorage` is what the image features depend on. `MinIOClient` is the
//! S3-compatible implementation used in production.

mod minio_client;

use async_trait::async_trait;

use crate::core::error::AppError;

pub use minio_client::MinIOClient;

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `data` under `key`, returning the key
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, AppError>;

    /// Remove the object stored under `key`
    async fn delete(&self, key: &str) -> Result<(), AppError>;

    /// Full object key for a path inside the publicly readable prefix
    fn public_key(&self, path: &str) -> String;

    /// URL browsers use to load the object
    fn file_url(&self, key: &str) -> String;
}
