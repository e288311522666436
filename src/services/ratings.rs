use std::sync::Arc;

use crate::{
    db::RatingStore,
    errors::AppError,
    models::{
        Rating, Subject,
        rating::{CreateRatingPayload, MAX_RATING, MIN_RATING, UpdateRatingPayload},
    },
};

use super::{non_empty, parse_record_id};

const NOT_FOUND: &str = "Rating not found";

#[derive(Clone)]
pub struct RatingService {
    store: Arc<dyn RatingStore>,
}

impl RatingService {
    pub fn new(store: Arc<dyn RatingStore>) -> Self {
        Self { store }
    }

    /// Creates the subject's rating for an item, or replaces the value of the one they already have.
    pub async fn create(
        &self,
        subject: &Subject,
        payload: CreateRatingPayload,
    ) -> Result<Rating, AppError> {
        let (Some(item_id), Some(value)) = (non_empty(payload.item_id), payload.value) else {
            return Err(AppError::BadRequest("itemId and value are required".into()));
        };
        let value = validate_value(value)?;

        let rating = self
            .store
            .upsert_rating(&subject.id, &item_id, value)
            .await
            .map_err(|e| AppError::store("Could not save rating", e))?;

        tracing::info!(
            "Rating {} set to {} by {} on item {}",
            rating.id,
            rating.value,
            subject.id,
            rating.item_id
        );
        Ok(rating)
    }

    /// Unscoped when `item_id` is absent.
    pub async fn list(&self, item_id: Option<String>) -> Result<Vec<Rating>, AppError> {
        let item_id = non_empty(item_id);
        self.store
            .find_ratings(item_id.as_deref())
            .await
            .map_err(|e| AppError::store("Could not fetch ratings", e))
    }

    pub async fn get(&self, id: &str) -> Result<Rating, AppError> {
        let id = parse_record_id(id, NOT_FOUND)?;
        self.store
            .find_rating(id)
            .await
            .map_err(|e| AppError::store("Could not fetch rating", e))?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn update(
        &self,
        subject: &Subject,
        id: &str,
        payload: UpdateRatingPayload,
    ) -> Result<Rating, AppError> {
        let rating = self
            .load_owned(subject, id, "Could not update rating")
            .await?;

        let value = payload
            .value
            .ok_or_else(|| AppError::BadRequest("value is required".into()))
            .and_then(validate_value)?;

        let updated = self
            .store
            .update_rating_value(rating.id, value)
            .await
            .map_err(|e| AppError::store("Could not update rating", e))?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;

        tracing::info!("Rating {} updated to {} by {}", updated.id, value, subject.id);
        Ok(updated)
    }

    pub async fn delete(&self, subject: &Subject, id: &str) -> Result<(), AppError> {
        let rating = self
            .load_owned(subject, id, "Could not delete rating")
            .await?;

        let removed = self
            .store
            .delete_rating(rating.id)
            .await
            .map_err(|e| AppError::store("Could not delete rating", e))?;
        if !removed {
            return Err(AppError::NotFound(NOT_FOUND.into()));
        }

        tracing::info!("Rating {} deleted by {}", rating.id, subject.id);
        Ok(())
    }

    async fn load_owned(
        &self,
        subject: &Subject,
        id: &str,
        failure: &'static str,
    ) -> Result<Rating, AppError> {
        let id = parse_record_id(id, NOT_FOUND)?;
        let rating = self
            .store
            .find_rating(id)
            .await
            .map_err(|e| AppError::store(failure, e))?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;

        if rating.user_id != subject.id {
            tracing::warn!(
                "Subject {} attempted to modify rating {} owned by {}",
                subject.id,
                rating.id,
                rating.user_id
            );
            return Err(AppError::Forbidden("Not authorized".into()));
        }

        Ok(rating)
    }
}

fn validate_value(value: i64) -> Result<i32, AppError> {
    i32::try_from(value)
        .ok()
        .filter(|v| (MIN_RATING..=MAX_RATING).contains(v))
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "value must be an integer between {MIN_RATING} and {MAX_RATING}"
            ))
        })
}
