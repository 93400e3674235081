use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    dto::profile::{ProfileOverview, UpdateProfileRequest},
    entity::{
        Profiles,
        profiles::{ActiveModel, Model as ProfileModel},
    },
    error::AppResult,
    models::Profile,
    response::{ApiResponse, Meta},
    services::product_service::fetch_owned,
    state::AppState,
};

fn profile_from_entity(model: ProfileModel) -> Profile {
    Profile {
        id: model.id,
        full_name: model.full_name,
        phone: model.phone,
    }
}

pub async fn overview(
    state: &AppState,
    user_id: Uuid,
    email: Option<String>,
) -> AppResult<ApiResponse<ProfileOverview>> {
    let profile = Profiles::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .map(profile_from_entity);
    let listings = fetch_owned(state, user_id).await?;

    let meta = Meta::total(listings.len());
    let data = ProfileOverview {
        email,
        profile,
        listings,
    };
    Ok(ApiResponse::success("Profile", data, Some(meta)))
}

pub async fn update_profile(
    state: &AppState,
    user_id: Uuid,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<Profile>> {
    let full_name = payload.full_name.trim().to_string();
    let phone = payload
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    let saved = match Profiles::find_by_id(user_id).one(&state.orm).await? {
        Some(existing) => {
            let mut active: ActiveModel = existing.into();
            active.full_name = Set(full_name);
            active.phone = Set(phone);
            active.update(&state.orm).await?
        }
        None => {
            ActiveModel {
                id: Set(user_id),
                full_name: Set(full_name),
                phone: Set(phone),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };
    tracing::info!(%user_id, "profile updated");

    Ok(ApiResponse::success(
        "Profile updated successfully",
        profile_from_entity(saved),
        Some(Meta::empty()),
    ))
}
