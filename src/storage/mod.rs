//! Object storage for listing images.
//!
//! Images live in a single bucket and are addressed by `{user_id}/{millis}.{ext}`
//! keys. Every backend can turn a key into the public URL stored on the
//! product row, and none of them overwrites an existing key.

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;
use uuid::Uuid;

mod local;
mod memory;
mod remote;

pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;
pub use remote::RemoteObjectStore;

pub const PRODUCT_BUCKET: &str = "products";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid object key `{0}`")]
    InvalidKey(String),

    #[error("object `{0}` already exists")]
    AlreadyExists(String),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn bucket(&self) -> &str;

    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn public_url(&self, key: &str) -> String;
}

/// Lower-cased extension of a client file name, if it has a plain one.
pub fn file_extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
}

/// Build the object key for an upload made by `user_id` at `millis`.
pub fn object_key(user_id: Uuid, millis: i64, ext: &str) -> String {
    format!("{user_id}/{millis}.{ext}")
}

pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key
            .split('/')
            .any(|part| part.is_empty() || part == "." || part == "..");
    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
