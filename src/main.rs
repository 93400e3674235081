use std::{net::SocketAddr, sync::Arc, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_market::{
    app::{AppOptions, build_app},
    config::{AppConfig, StorageBackend},
    db::{create_pool, orm_from_pool, run_migrations},
    services::session_service::SessionProvider,
    state::AppState,
    storage::{LocalObjectStore, ObjectStore, PRODUCT_BUCKET, RemoteObjectStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,campus_market=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&orm_from_pool(&pool)).await?;

    let mut options = AppOptions {
        max_upload_bytes: config.max_upload_bytes,
        local_bucket: None,
    };
    let storage: Arc<dyn ObjectStore> = match config.storage_backend {
        StorageBackend::Local => {
            let store = LocalObjectStore::new(
                &config.storage_root,
                PRODUCT_BUCKET,
                &config.public_base_url,
            );
            tokio::fs::create_dir_all(store.bucket_dir()).await?;
            options.local_bucket = Some((PRODUCT_BUCKET.to_string(), store.bucket_dir()));
            Arc::new(store)
        }
        StorageBackend::Remote => {
            let (Some(url), Some(key)) = (&config.storage_url, &config.storage_key) else {
                anyhow::bail!("STORAGE_URL and STORAGE_KEY are required for remote storage");
            };
            Arc::new(RemoteObjectStore::new(url, key, PRODUCT_BUCKET))
        }
    };
    tracing::info!(backend = ?config.storage_backend, bucket = PRODUCT_BUCKET, "object storage ready");

    let sessions = Arc::new(SessionProvider::new(&config.jwt_secret));
    let mut auth_events = sessions.subscribe();
    tokio::spawn(async move {
        while let Some(event) = auth_events.recv().await {
            tracing::info!(?event, "auth state changed");
        }
    });

    let state = AppState::new(
        pool,
        storage,
        sessions,
        Duration::from_secs(config.cache_ttl_secs),
    );
    let app = build_app(state, options);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
