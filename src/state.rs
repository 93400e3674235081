use std::{sync::Arc, time::Duration};

use uuid::Uuid;

use crate::{
    cache::TtlCache,
    db::{DbPool, OrmConn, orm_from_pool},
    models::{Category, Product},
    services::session_service::SessionProvider,
    storage::ObjectStore,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub storage: Arc<dyn ObjectStore>,
    pub sessions: Arc<SessionProvider>,
    pub products: Arc<TtlCache<Uuid, Product>>,
    pub categories: Arc<TtlCache<(), Vec<Category>>>,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        storage: Arc<dyn ObjectStore>,
        sessions: Arc<SessionProvider>,
        cache_ttl: Duration,
    ) -> Self {
        let orm = orm_from_pool(&pool);
        Self {
            pool,
            orm,
            storage,
            sessions,
            products: Arc::new(TtlCache::new(cache_ttl)),
            categories: Arc::new(TtlCache::new(cache_ttl)),
        }
    }
}
