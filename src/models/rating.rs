use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: Uuid,
    pub user_id: String,
    pub item_id: String,
    pub value: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingPayload {
    #[serde(default, deserialize_with = "super::string_or_number")]
    pub item_id: Option<String>,
    pub value: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRatingPayload {
    pub value: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingQuery {
    pub item_id: Option<String>,
}
