use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{
        CatalogQuery, CreateProductForm, DeleteQuery, DetailQuery, ProductCardList, ProductDetail,
        UpdateProductRequest,
    },
    error::AppResult,
    middleware::auth::MaybeSession,
    models::Product,
    response::ApiResponse,
    services::{catalog_service, detail_service, listing_service, session_service::Session},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Available listings, newest first, narrowed by category slug and title search", body = ApiResponse<ProductCardList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<ApiResponse<ProductCardList>> {
    Json(catalog_service::list_catalog(&state, query).await)
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        DetailQuery
    ),
    responses(
        (status = 200, description = "Product with seller and viewer controls", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Path(id): Path<Uuid>,
    Query(query): Query<DetailQuery>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let viewer = session.map(|s| s.user_id);
    let resp = detail_service::product_detail(&state, viewer, id, query.show_contact).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body(content = CreateProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Listing created", body = ApiResponse<Product>),
        (status = 400, description = "Invalid listing"),
        (status = 401, description = "Not signed in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    session: MaybeSession,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Product>>> {
    let session = session.require("Please sign in to add products")?;
    let (input, image) = listing_service::read_listing_form(multipart).await?;
    let resp = listing_service::create_listing(&state, session.user_id, input, image).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Listing updated", body = ApiResponse<Product>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = listing_service::update_listing(&state, session.user_id, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        DeleteQuery
    ),
    responses(
        (status = 200, description = "Listing deleted"),
        (status = 400, description = "Deletion not confirmed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = detail_service::delete_listing(&state, session.user_id, id, query.confirm).await?;
    Ok(Json(resp))
}
