use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A flat comment record. `parent_id` points at another comment but no tree is ever rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub user_id: String,
    pub item_id: String,
    pub parent_id: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: String,
    pub item_id: String,
    pub parent_id: Option<String>,
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentPayload {
    #[serde(default, deserialize_with = "super::string_or_number")]
    pub item_id: Option<String>,
    pub text: Option<String>,
    #[serde(default, deserialize_with = "super::string_or_number")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentPayload {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentQuery {
    pub item_id: Option<String>,
}
