use sea_orm::{EntityTrait, QueryOrder};
use uuid::Uuid;

use crate::{
    dto::categories::{CategoryFilterOption, CategoryList},
    entity::{Categories, categories::Column},
    error::{AppError, AppResult},
    models::Category,
    response::{ApiResponse, Meta},
    services::filter::CATEGORY_FILTERS,
    state::AppState,
};

async fn fetch_categories(state: &AppState) -> AppResult<Option<Vec<Category>>> {
    let items = Categories::find()
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|model| Category {
            id: model.id,
            name: model.name,
        })
        .collect();
    Ok(Some(items))
}

pub async fn categories(state: &AppState) -> AppResult<Vec<Category>> {
    let items = state
        .categories
        .get_or_try_load((), || fetch_categories(state))
        .await?;
    Ok(items.unwrap_or_default())
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = categories(state).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(meta),
    ))
}

pub fn filter_options() -> ApiResponse<Vec<CategoryFilterOption>> {
    ApiResponse::success("Category filters", CATEGORY_FILTERS.to_vec(), None)
}

/// A listing must reference an existing category.
pub async fn ensure_category(state: &AppState, id: Uuid) -> AppResult<()> {
    if id.is_nil() {
        return Err(AppError::BadRequest("Category is required".into()));
    }
    let known = categories(state).await?.iter().any(|c| c.id == id);
    if known {
        return Ok(());
    }
    // The cached list may predate a freshly seeded category.
    if Categories::find_by_id(id).one(&state.orm).await?.is_some() {
        state.categories.clear().await;
        return Ok(());
    }
    Err(AppError::BadRequest("Unknown category".into()))
}
