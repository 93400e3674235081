use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{Condition, Product, ProductCard, ProductStatus};

/// Fields shared by the create form and the update body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub condition: Condition,
    pub category_id: Uuid,
}

/// Multipart body of `POST /api/products`; documented for the OpenAPI page only.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct CreateProductForm {
    pub title: String,
    pub description: Option<String>,
    pub price: String,
    #[schema(example = "like-new")]
    pub condition: String,
    pub category_id: Uuid,
    /// PNG, JPEG, WebP or GIF.
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(flatten)]
    pub input: ProductInput,
    #[serde(default)]
    pub status: Option<ProductStatus>,
}

/// An image part pulled out of the create form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: axum::body::Bytes,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Free-text title search.
    pub search: Option<String>,
    /// Category slug, `all` when absent.
    pub category: Option<String>,
    /// Cap on rows loaded before filtering.
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DetailQuery {
    #[serde(default)]
    pub show_contact: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductCardList {
    #[schema(value_type = Vec<ProductCard>)]
    pub items: Vec<ProductCard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewerControls {
    /// Viewer owns the listing: edit and delete.
    Owner,
    /// Anyone else: reveal seller contact.
    Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SellerContact {
    pub full_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub seller_name: String,
    pub controls: ViewerControls,
    pub contact: Option<SellerContact>,
}
