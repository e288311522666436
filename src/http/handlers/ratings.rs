use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    auth::AuthSubject,
    errors::AppError,
    http::extract::{ValidatedJson, ValidatedQuery},
    models::{
        Rating,
        rating::{CreateRatingPayload, RatingQuery, UpdateRatingPayload},
    },
    state::AppState,
};

pub async fn create_rating_handler(
    State(state): State<AppState>,
    AuthSubject(subject): AuthSubject,
    ValidatedJson(payload): ValidatedJson<CreateRatingPayload>,
) -> Result<(StatusCode, Json<Rating>), AppError> {
    let rating = state.ratings.create(&subject, payload).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

pub async fn list_ratings_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<RatingQuery>,
) -> Result<Json<Vec<Rating>>, AppError> {
    let ratings = state.ratings.list(query.item_id).await?;
    Ok(Json(ratings))
}

pub async fn get_rating_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Rating>, AppError> {
    let rating = state.ratings.get(&id).await?;
    Ok(Json(rating))
}

pub async fn update_rating_handler(
    State(state): State<AppState>,
    AuthSubject(subject): AuthSubject,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateRatingPayload>,
) -> Result<Json<Rating>, AppError> {
    let rating = state.ratings.update(&subject, &id, payload).await?;
    Ok(Json(rating))
}

pub async fn delete_rating_handler(
    State(state): State<AppState>,
    AuthSubject(subject): AuthSubject,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.ratings.delete(&subject, &id).await?;
    Ok(Json(json!({ "success": true })))
}
