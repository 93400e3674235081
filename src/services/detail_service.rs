use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    dto::products::{ProductDetail, SellerContact, ViewerControls},
    entity::{Products, Profiles},
    error::{AppError, AppResult},
    middleware::auth::ensure_owner,
    models::Profile,
    response::ApiResponse,
    services::product_service::cached_product,
    state::AppState,
};

pub const UNKNOWN_SELLER: &str = "Unknown";

/// Owners get edit/delete; everyone else, anonymous included, gets the contact reveal.
pub fn viewer_controls(viewer: Option<Uuid>, owner_id: Uuid) -> ViewerControls {
    match viewer {
        Some(id) if id == owner_id => ViewerControls::Owner,
        _ => ViewerControls::Contact,
    }
}

pub fn seller_name(profile: Option<&Profile>) -> String {
    profile
        .map(|p| p.full_name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_SELLER)
        .to_string()
}

/// Contact fields appear only after the viewer asked for them.
pub fn revealed_contact(
    controls: ViewerControls,
    show_contact: bool,
    profile: Option<&Profile>,
) -> Option<SellerContact> {
    if controls != ViewerControls::Contact || !show_contact {
        return None;
    }
    Some(SellerContact {
        full_name: seller_name(profile),
        phone: profile.and_then(|p| p.phone.clone()),
    })
}

async fn fetch_profile(state: &AppState, user_id: Uuid) -> AppResult<Option<Profile>> {
    let profile = Profiles::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .map(|model| Profile {
            id: model.id,
            full_name: model.full_name,
            phone: model.phone,
        });
    Ok(profile)
}

pub async fn product_detail(
    state: &AppState,
    viewer: Option<Uuid>,
    id: Uuid,
    show_contact: bool,
) -> AppResult<ApiResponse<ProductDetail>> {
    let product = cached_product(state, id)
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;

    let profile = fetch_profile(state, product.user_id).await?;
    let controls = viewer_controls(viewer, product.user_id);
    let contact = revealed_contact(controls, show_contact, profile.as_ref());

    let detail = ProductDetail {
        seller_name: seller_name(profile.as_ref()),
        controls,
        contact,
        product,
    };
    Ok(ApiResponse::success("Product", detail, None))
}

pub async fn delete_listing(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    confirmed: bool,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if !confirmed {
        return Err(AppError::BadRequest("Deletion must be confirmed".into()));
    }

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;
    ensure_owner(user_id, existing.user_id)?;

    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Product not found"));
    }
    state.products.invalidate(&id).await;
    tracing::info!(product_id = %id, %user_id, "product deleted");

    Ok(ApiResponse::ack("Product deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(phone: Option<&str>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            full_name: "Rahim Uddin".into(),
            phone: phone.map(str::to_string),
        }
    }

    #[test]
    fn owner_sees_owner_controls() {
        let owner = Uuid::new_v4();
        assert_eq!(viewer_controls(Some(owner), owner), ViewerControls::Owner);
        assert_eq!(
            viewer_controls(Some(Uuid::new_v4()), owner),
            ViewerControls::Contact
        );
        assert_eq!(viewer_controls(None, owner), ViewerControls::Contact);
    }

    #[test]
    fn contact_is_withheld_until_requested() {
        let p = profile(Some("01700000000"));
        assert_eq!(revealed_contact(ViewerControls::Contact, false, Some(&p)), None);

        let shown = revealed_contact(ViewerControls::Contact, true, Some(&p)).unwrap();
        assert_eq!(shown.full_name, "Rahim Uddin");
        assert_eq!(shown.phone.as_deref(), Some("01700000000"));
    }

    #[test]
    fn owners_never_get_a_contact_block() {
        let p = profile(None);
        assert_eq!(revealed_contact(ViewerControls::Owner, true, Some(&p)), None);
    }

    #[test]
    fn missing_profile_reads_as_unknown_seller() {
        assert_eq!(seller_name(None), UNKNOWN_SELLER);
        let contact = revealed_contact(ViewerControls::Contact, true, None).unwrap();
        assert_eq!(contact.full_name, UNKNOWN_SELLER);
        assert_eq!(contact.phone, None);
    }
}
