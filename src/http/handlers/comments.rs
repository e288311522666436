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
        Comment,
        comment::{CommentQuery, CreateCommentPayload, UpdateCommentPayload},
    },
    state::AppState,
};

pub async fn create_comment_handler(
    State(state): State<AppState>,
    AuthSubject(subject): AuthSubject,
    ValidatedJson(payload): ValidatedJson<CreateCommentPayload>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let comment = state.comments.create(&subject, payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_comments_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<CommentQuery>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let comments = state.comments.list(query.item_id).await?;
    Ok(Json(comments))
}

pub async fn update_comment_handler(
    State(state): State<AppState>,
    AuthSubject(subject): AuthSubject,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateCommentPayload>,
) -> Result<Json<Comment>, AppError> {
    let comment = state.comments.update(&subject, &id, payload).await?;
    Ok(Json(comment))
}

pub async fn delete_comment_handler(
    State(state): State<AppState>,
    AuthSubject(subject): AuthSubject,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.comments.delete(&subject, &id).await?;
    Ok(Json(json!({ "success": true })))
}
