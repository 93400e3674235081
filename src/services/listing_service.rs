//! Create and update of a single listing, including the optional image upload.

use std::collections::HashMap;

use axum::{body::Bytes, extract::Multipart};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    dto::products::{ImageUpload, ProductInput, UpdateProductRequest},
    entity::{Products, products::ActiveModel},
    error::{AppError, AppResult},
    middleware::auth::ensure_owner,
    models::{Product, ProductStatus},
    response::{ApiResponse, Meta},
    services::{category_service::ensure_category, product_service::fetch_product},
    state::AppState,
    storage::{StorageError, file_extension, object_key},
};

pub const IMAGE_FIELD: &str = "image";

/// Accepted image formats as `(extension, content type)`.
pub const IMAGE_FORMATS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

/// Attempts at a fresh key when another upload took the same millisecond.
const UPLOAD_ATTEMPTS: i64 = 3;

/// Normalize and check the listing schema shared by create and update.
pub fn validate_input(input: ProductInput) -> AppResult<ProductInput> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title is required".into()));
    }
    if input.price <= Decimal::ZERO {
        return Err(AppError::BadRequest("Price must be positive".into()));
    }
    if input.price.round_dp(2) != input.price {
        return Err(AppError::BadRequest(
            "Price must have at most two decimal places".into(),
        ));
    }
    if input.category_id.is_nil() {
        return Err(AppError::BadRequest("Category is required".into()));
    }
    let description = input
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok(ProductInput {
        title: title.to_string(),
        description,
        price: input.price,
        condition: input.condition,
        category_id: input.category_id,
    })
}

fn required<'a>(fields: &'a HashMap<String, String>, name: &str, label: &str) -> AppResult<&'a str> {
    fields
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{label} is required")))
}

/// Build a listing from the text parts of the create form.
pub fn input_from_fields(fields: &HashMap<String, String>) -> AppResult<ProductInput> {
    let title = fields.get("title").cloned().unwrap_or_default();
    let description = fields.get("description").cloned();

    let price = required(fields, "price", "Price")?
        .parse::<Decimal>()
        .map_err(|_| AppError::BadRequest("Price must be a number".into()))?;
    let condition = required(fields, "condition", "Condition")?
        .parse()
        .map_err(AppError::BadRequest)?;
    let category = fields
        .get("category_id")
        .or_else(|| fields.get("category"))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest("Category is required".into()))?;
    let category_id = Uuid::parse_str(category)
        .map_err(|_| AppError::BadRequest("Unknown category".into()))?;

    Ok(ProductInput {
        title,
        description,
        price,
        condition,
        category_id,
    })
}

/// Drain a `multipart/form-data` create request.
pub async fn read_listing_form(
    mut multipart: Multipart,
) -> AppResult<(ProductInput, Option<ImageUpload>)> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == IMAGE_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid image upload: {e}")))?;
            // Browsers send an empty part when no file was picked.
            if !bytes.is_empty() {
                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?;
            fields.insert(name, value);
        }
    }

    Ok((input_from_fields(&fields)?, image))
}

/// An upload whose format has been checked against [`IMAGE_FORMATS`].
#[derive(Debug)]
pub struct CheckedImage {
    ext: &'static str,
    content_type: &'static str,
    bytes: Bytes,
}

/// Accept only the raster formats in [`IMAGE_FORMATS`], judged by file
/// extension; a declared content type must agree with it.
pub fn check_image(image: ImageUpload) -> AppResult<CheckedImage> {
    let rejected = || {
        AppError::BadRequest("Only PNG, JPEG, WebP or GIF images are supported".into())
    };
    let ext = image
        .file_name
        .as_deref()
        .and_then(file_extension)
        .ok_or_else(rejected)?;
    let &(ext, content_type) = IMAGE_FORMATS
        .iter()
        .find(|(known, _)| *known == ext)
        .ok_or_else(rejected)?;
    if let Some(declared) = image.content_type.as_deref() {
        if !declared.eq_ignore_ascii_case(content_type) {
            return Err(rejected());
        }
    }
    Ok(CheckedImage {
        ext,
        content_type,
        bytes: image.bytes,
    })
}

struct StoredImage {
    key: String,
    url: String,
}

async fn upload_image(
    state: &AppState,
    user_id: Uuid,
    image: CheckedImage,
    millis: i64,
) -> AppResult<StoredImage> {
    let mut attempt = 0;
    let key = loop {
        let key = object_key(user_id, millis + attempt, image.ext);
        match state
            .storage
            .put(&key, image.bytes.clone(), Some(image.content_type))
            .await
        {
            Ok(()) => break key,
            Err(StorageError::AlreadyExists(_)) if attempt + 1 < UPLOAD_ATTEMPTS => {
                tracing::debug!(%key, "object key taken, retrying");
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    };
    let url = state.storage.public_url(&key);
    tracing::debug!(%key, bucket = state.storage.bucket(), "image uploaded");
    Ok(StoredImage { key, url })
}

/// Remove an upload whose row was never written.
async fn discard_upload(state: &AppState, key: &str) {
    if let Err(err) = state.storage.remove(key).await {
        tracing::warn!(error = %err, %key, "failed to remove orphaned upload");
    }
}

pub async fn create_listing(
    state: &AppState,
    user_id: Uuid,
    input: ProductInput,
    image: Option<ImageUpload>,
) -> AppResult<ApiResponse<Product>> {
    let input = validate_input(input)?;
    let image = image.map(check_image).transpose()?;
    ensure_category(state, input.category_id).await?;

    let uploaded = match image {
        Some(image) => {
            let millis = Utc::now().timestamp_millis();
            Some(upload_image(state, user_id, image, millis).await?)
        }
        None => None,
    };

    let id = Uuid::new_v4();
    let active = ActiveModel {
        id: Set(id),
        user_id: Set(user_id),
        title: Set(input.title),
        description: Set(input.description),
        price: Set(input.price),
        condition: Set(input.condition.as_str().to_string()),
        category_id: Set(Some(input.category_id)),
        image_url: Set(uploaded.as_ref().map(|u| u.url.clone())),
        status: Set(ProductStatus::Available.as_str().to_string()),
        created_at: NotSet,
    };

    if let Err(err) = active.insert(&state.orm).await {
        if let Some(upload) = &uploaded {
            discard_upload(state, &upload.key).await;
        }
        return Err(err.into());
    }

    let product = fetch_product(state, id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("product {id} missing after insert")))?;
    tracing::info!(product_id = %id, %user_id, "product listed");

    Ok(ApiResponse::success(
        "Product listed successfully!",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn update_listing(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let input = validate_input(payload.input)?;

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;
    ensure_owner(user_id, existing.user_id)?;
    ensure_category(state, input.category_id).await?;

    let mut active: ActiveModel = existing.into();
    active.title = Set(input.title);
    active.description = Set(input.description);
    active.price = Set(input.price);
    active.condition = Set(input.condition.as_str().to_string());
    active.category_id = Set(Some(input.category_id));
    if let Some(status) = payload.status {
        active.status = Set(status.as_str().to_string());
    }
    active.update(&state.orm).await?;
    state.products.invalidate(&id).await;

    let product = fetch_product(state, id)
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;
    tracing::info!(product_id = %id, %user_id, "product updated");

    Ok(ApiResponse::success(
        "Product updated successfully",
        product,
        Some(Meta::empty()),
    ))
}
