use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::SessionResponse,
        categories::{CategoryFilterOption, CategoryList},
        products::{
            CreateProductForm, ProductCardList, ProductDetail, ProductInput, SellerContact,
            UpdateProductRequest, ViewerControls,
        },
        profile::{ProfileOverview, UpdateProfileRequest},
        reviews::{CreateReviewRequest, ReviewList},
    },
    models::{Category, Condition, Product, ProductCard, ProductStatus, Profile, Review},
    response::{ApiResponse, Meta},
    routes::{auth, categories, health, home, products, profile, reviews},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        home::home_feed,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::category_filters,
        profile::get_profile,
        profile::update_profile,
        reviews::list_reviews,
        reviews::submit_review,
        auth::current_session,
        auth::sign_out
    ),
    components(
        schemas(
            Product,
            ProductCard,
            ProductStatus,
            Condition,
            Category,
            Profile,
            Review,
            ProductInput,
            CreateProductForm,
            UpdateProductRequest,
            ProductCardList,
            ProductDetail,
            ViewerControls,
            SellerContact,
            CategoryFilterOption,
            CategoryList,
            ProfileOverview,
            UpdateProfileRequest,
            CreateReviewRequest,
            ReviewList,
            SessionResponse,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductCardList>,
            ApiResponse<ProductDetail>,
            ApiResponse<ReviewList>,
            ApiResponse<ProfileOverview>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Products", description = "Catalog, listing editor and product detail"),
        (name = "Categories", description = "Category table and filter slugs"),
        (name = "Profile", description = "Caller's profile and listings"),
        (name = "Reviews", description = "Marketplace review feed"),
        (name = "Auth", description = "Session introspection and sign-out"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
