use crate::{
    dto::products::{CatalogQuery, ProductCardList},
    models::ProductCard,
    response::{ApiResponse, Meta},
    services::{
        filter::{ALL_CATEGORIES, filter_products},
        product_service::fetch_available,
    },
    state::AppState,
};

pub const HOME_FEED_SIZE: u64 = 8;

pub const EMPTY_CATALOG: &str = "No products available yet";
pub const NO_MATCHES: &str = "No products found";

/// Available listings, newest first. Read failures degrade to an empty catalog.
pub async fn load_catalog(state: &AppState, limit: Option<u64>) -> Vec<ProductCard> {
    match fetch_available(state, limit).await {
        Ok(products) => products.iter().map(ProductCard::from).collect(),
        Err(err) => {
            tracing::error!(error = ?err, "error fetching products");
            Vec::new()
        }
    }
}

pub fn catalog_message(loaded: usize, shown: usize) -> &'static str {
    if loaded == 0 {
        EMPTY_CATALOG
    } else if shown == 0 {
        NO_MATCHES
    } else {
        "Products"
    }
}

/// The search text as typed; a blank box means no search.
pub fn search_term(search: Option<&str>) -> &str {
    search.filter(|s| !s.trim().is_empty()).unwrap_or_default()
}

pub async fn list_catalog(state: &AppState, query: CatalogQuery) -> ApiResponse<ProductCardList> {
    let catalog = load_catalog(state, query.limit).await;

    let slug = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(ALL_CATEGORIES);
    let search = search_term(query.search.as_deref());

    let items = filter_products(&catalog, slug, search);
    tracing::debug!(loaded = catalog.len(), shown = items.len(), slug, "catalog filtered");

    let message = catalog_message(catalog.len(), items.len());
    let meta = Meta::total(items.len());
    ApiResponse::success(message, ProductCardList { items }, Some(meta))
}

pub async fn home_feed(state: &AppState) -> ApiResponse<ProductCardList> {
    let items = load_catalog(state, Some(HOME_FEED_SIZE)).await;
    let message = catalog_message(items.len(), items.len());
    let meta = Meta::total(items.len());
    ApiResponse::success(message, ProductCardList { items }, Some(meta))
}
