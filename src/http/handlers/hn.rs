use axum::{
    Json,
    extract::State,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    errors::AppError,
    http::extract::ValidatedQuery,
    hn::{search_limit, top_stories_limit},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct TopStoriesQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<String>,
}

pub async fn top_stories_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<TopStoriesQuery>,
) -> Result<Json<Vec<Value>>, AppError> {
    let limit = top_stories_limit(query.limit.as_deref());
    let stories = state.hn.top_stories(limit).await?;
    Ok(Json(stories))
}

pub async fn search_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<SearchQuery>,
) -> Result<Json<Vec<Value>>, AppError> {
    let q = query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing `q` (query) parameter".into()))?;
    let limit = search_limit(query.limit.as_deref());

    let hits = state.hn.search(&q, limit).await?;
    tracing::debug!("Search '{}' returned {} hits", q, hits.len());
    Ok(Json(hits))
}
