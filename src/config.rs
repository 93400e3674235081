use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    Remote,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub public_base_url: String,
    pub storage_backend: StorageBackend,
    pub storage_root: String,
    pub storage_url: Option<String>,
    pub storage_key: Option<String>,
    pub cache_ttl_secs: u64,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let public_base_url =
            env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| format!("http://{host}:{port}"));

        let storage_backend = match env::var("STORAGE_BACKEND").as_deref() {
            Ok("remote") => StorageBackend::Remote,
            Ok("local") | Err(_) => StorageBackend::Local,
            Ok(other) => anyhow::bail!("unknown STORAGE_BACKEND `{other}`"),
        };
        let storage_root = env::var("STORAGE_ROOT").unwrap_or_else(|_| "./storage".to_string());
        let storage_url = env::var("STORAGE_URL").ok();
        let storage_key = env::var("STORAGE_KEY").ok();
        if storage_backend == StorageBackend::Remote
            && (storage_url.is_none() || storage_key.is_none())
        {
            anyhow::bail!("STORAGE_URL and STORAGE_KEY are required for remote storage");
        }

        let cache_ttl_secs = env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(10 * 1024 * 1024);

        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
            public_base_url,
            storage_backend,
            storage_root,
            storage_url,
            storage_key,
            cache_ttl_secs,
            max_upload_bytes,
        })
    }
}
