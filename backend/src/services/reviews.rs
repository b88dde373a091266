//! Review service

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{NewReview, Repositories, ReviewChanges};
use afrofood_shared::models::Review;
use afrofood_shared::types::{CreateReviewRequest, UpdateReviewRequest};
use afrofood_shared::validation::validate_rating;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Review service
pub struct ReviewService;

impl ReviewService {
    pub async fn list(repos: &Repositories) -> ApiResult<Vec<Review>> {
        Ok(repos.reviews.list().await?)
    }

    pub async fn get(repos: &Repositories, id: Uuid) -> ApiResult<Review> {
        repos
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(ApiError::not_found::<Review>)
    }

    /// Reviews written by one user
    pub async fn by_user(repos: &Repositories, user_id: Uuid) -> ApiResult<Vec<Review>> {
        Ok(repos.reviews.find_by_user(user_id).await?)
    }

    /// Create a review authored by the caller
    pub async fn create(
        repos: &Repositories,
        principal: &Principal,
        req: CreateReviewRequest,
    ) -> ApiResult<Review> {
        req.validate()?;
        validate_rating(req.ratings).map_err(ApiError::Validation)?;

        let review = repos
            .reviews
            .insert(NewReview {
                user_id: Some(principal.id()),
                comments: req.comments,
                ratings: req.ratings,
            })
            .await?;

        info!(review_id = %review.id, user_id = %principal.id(), "Review created");
        Ok(review)
    }

    /// Update a review; only its author or an admin may
    pub async fn update(
        repos: &Repositories,
        principal: &Principal,
        id: Uuid,
        req: UpdateReviewRequest,
    ) -> ApiResult<Review> {
        req.validate()?;
        if let Some(ratings) = req.ratings {
            validate_rating(ratings).map_err(ApiError::Validation)?;
        }

        let existing = Self::get(repos, id).await?;
        principal.ensure_can_act_for(existing.user_id)?;

        repos
            .reviews
            .update(
                id,
                ReviewChanges {
                    comments: req.comments,
                    ratings: req.ratings,
                },
            )
            .await?
            .ok_or_else(ApiError::not_found::<Review>)
    }

    pub async fn delete(repos: &Repositories, principal: &Principal, id: Uuid) -> ApiResult<()> {
        let existing = Self::get(repos, id).await?;
        principal.ensure_can_act_for(existing.user_id)?;

        if !repos.reviews.delete(id).await? {
            return Err(ApiError::not_found::<Review>());
        }
        info!(review_id = %id, "Review deleted");
        Ok(())
    }
}
