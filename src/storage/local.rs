use std::path::PathBuf;

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::{fs, io::AsyncWriteExt};

use super::{ObjectStore, StorageError, validate_key};

/// Filesystem-backed bucket, served by the app itself under `/storage/{bucket}`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    bucket: String,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(
        root: impl Into<PathBuf>,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Directory holding this bucket's objects.
    pub fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        _content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        validate_key(key)?;
        let path = self.bucket_dir().join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(key.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        file.write_all(&bytes).await?;
        file.flush().await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "stored object");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        match fs::remove_file(self.bucket_dir().join(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/storage/{}/{}", self.public_base_url, self.bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn existing_key_is_never_overwritten() {
        let root = std::env::temp_dir().join(format!("campus-market-{}", Uuid::new_v4()));
        let store = LocalObjectStore::new(&root, "products", "http://localhost:3000/");

        store
            .put("u/1.png", Bytes::from_static(b"first"), Some("image/png"))
            .await
            .unwrap();
        let second = store
            .put("u/1.png", Bytes::from_static(b"second"), Some("image/png"))
            .await;
        assert!(matches!(second, Err(StorageError::AlreadyExists(_))));

        let on_disk = fs::read(store.bucket_dir().join("u/1.png")).await.unwrap();
        assert_eq!(on_disk, b"first");
        assert_eq!(
            store.public_url("u/1.png"),
            "http://localhost:3000/storage/products/u/1.png"
        );

        fs::remove_dir_all(&root).await.unwrap();
    }
}
