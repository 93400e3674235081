use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::reviews::{CreateReviewRequest, ReviewList},
    entity::{
        Reviews,
        reviews::{ActiveModel, Column, Model as ReviewModel},
    },
    error::{AppError, AppResult},
    models::Review,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Reject out-of-range ratings and blank comments before any storage call.
pub fn validate_review(payload: CreateReviewRequest) -> AppResult<CreateReviewRequest> {
    if !(MIN_RATING..=MAX_RATING).contains(&payload.rating) {
        return Err(AppError::BadRequest(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    let comment = payload.comment.trim();
    if comment.is_empty() {
        return Err(AppError::BadRequest("Comment is required".into()));
    }
    Ok(CreateReviewRequest {
        rating: payload.rating,
        comment: comment.to_string(),
    })
}

pub async fn list_reviews(state: &AppState) -> AppResult<ApiResponse<ReviewList>> {
    let items: Vec<Review> = Reviews::find()
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(review_from_entity)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Reviews", ReviewList { items }, Some(meta)))
}

pub async fn submit_review(
    state: &AppState,
    user_id: Uuid,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    let payload = validate_review(payload)?;

    let review = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        rating: Set(payload.rating),
        comment: Set(payload.comment),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    tracing::info!(review_id = %review.id, %user_id, rating = review.rating, "review submitted");

    Ok(ApiResponse::success(
        "Review submitted successfully!",
        review_from_entity(review),
        Some(Meta::empty()),
    ))
}

fn review_from_entity(model: ReviewModel) -> Review {
    Review {
        id: model.id,
        user_id: model.user_id,
        rating: model.rating,
        comment: model.comment,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: i32, comment: &str) -> CreateReviewRequest {
        CreateReviewRequest {
            rating,
            comment: comment.into(),
        }
    }

    #[test]
    fn ratings_outside_one_to_five_are_rejected() {
        for rating in [-1, 0, 6, 100] {
            assert!(validate_review(review(rating, "fine")).is_err(), "{rating}");
        }
        for rating in MIN_RATING..=MAX_RATING {
            assert!(validate_review(review(rating, "fine")).is_ok(), "{rating}");
        }
    }

    #[test]
    fn blank_comment_is_rejected() {
        let err = validate_review(review(4, "  \n")).unwrap_err();
        assert_eq!(err.to_string(), "Comment is required");
    }
}
