use async_trait::async_trait;
use axum::body::Bytes;

use super::{ObjectStore, StorageError, validate_key};

/// Client for the hosted storage REST API.
#[derive(Debug, Clone)]
pub struct RemoteObjectStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl RemoteObjectStore {
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            bucket: bucket.into(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key)
    }
}

async fn check(key: &str, resp: reqwest::Response) -> Result<(), StorageError> {
    if resp.status().is_success() {
        return Ok(());
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(rejection(key, status, body))
}

/// The storage API reports a duplicate key as 409, sometimes wrapped in a 400 body.
fn rejection(key: &str, status: u16, body: String) -> StorageError {
    if status == 409 || body.contains("\"statusCode\":\"409\"") {
        return StorageError::AlreadyExists(key.to_string());
    }
    StorageError::Rejected { status, body }
}

#[async_trait]
impl ObjectStore for RemoteObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        validate_key(key)?;
        let resp = self
            .client
            .post(self.object_url(key))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("x-upsert", "false")
            .header(
                reqwest::header::CONTENT_TYPE,
                content_type.unwrap_or("application/octet-stream"),
            )
            .body(bytes)
            .send()
            .await?;
        check(key, resp).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let resp = self
            .client
            .delete(self.object_url(key))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await?;
        check(key, resp).await
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_points_at_public_bucket_path() {
        let store = RemoteObjectStore::new("https://example.test/", "key", "products");
        assert_eq!(
            store.public_url("u/1.png"),
            "https://example.test/storage/v1/object/public/products/u/1.png"
        );
        assert_eq!(
            store.object_url("u/1.png"),
            "https://example.test/storage/v1/object/products/u/1.png"
        );
    }

    #[test]
    fn duplicate_upload_maps_to_already_exists() {
        assert!(matches!(
            rejection("u/1.png", 409, String::new()),
            StorageError::AlreadyExists(_)
        ));
        let wrapped = r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#;
        assert!(matches!(
            rejection("u/1.png", 400, wrapped.to_string()),
            StorageError::AlreadyExists(_)
        ));
        assert!(matches!(
            rejection("u/1.png", 403, "denied".into()),
            StorageError::Rejected { status: 403, .. }
        ));
    }
}
