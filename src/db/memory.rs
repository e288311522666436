use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CommentStore, RatingStore, StoreError};
use crate::models::{Comment, Rating, comment::NewComment};

/// Process-local store used when no database is configured, and by the tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ratings: Mutex<Vec<Rating>>,
    comments: Mutex<Vec<Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingStore for MemoryStore {
    async fn upsert_rating(
        &self,
        user_id: &str,
        item_id: &str,
        value: i32,
    ) -> Result<Rating, StoreError> {
        let mut ratings = self.ratings.lock().await;
        let now = Utc::now();

        if let Some(existing) = ratings
            .iter_mut()
            .find(|r| r.user_id == user_id && r.item_id == item_id)
        {
            existing.value = value;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let rating = Rating {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            item_id: item_id.to_string(),
            value,
            created_at: now,
            updated_at: now,
        };
        ratings.push(rating.clone());
        Ok(rating)
    }

    async fn find_ratings(&self, item_id: Option<&str>) -> Result<Vec<Rating>, StoreError> {
        let ratings = self.ratings.lock().await;
        Ok(ratings
            .iter()
            .filter(|r| item_id.is_none_or(|item| r.item_id == item))
            .cloned()
            .collect())
    }

    async fn find_rating(&self, id: Uuid) -> Result<Option<Rating>, StoreError> {
        let ratings = self.ratings.lock().await;
        Ok(ratings.iter().find(|r| r.id == id).cloned())
    }

    async fn update_rating_value(
        &self,
        id: Uuid,
        value: i32,
    ) -> Result<Option<Rating>, StoreError> {
        let mut ratings = self.ratings.lock().await;
        Ok(ratings.iter_mut().find(|r| r.id == id).map(|rating| {
            rating.value = value;
            rating.updated_at = Utc::now();
            rating.clone()
        }))
    }

    async fn delete_rating(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut ratings = self.ratings.lock().await;
        let before = ratings.len();
        ratings.retain(|r| r.id != id);
        Ok(ratings.len() != before)
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let mut comments = self.comments.lock().await;
        let now = Utc::now();

        let comment = Comment {
            id: Uuid::new_v4(),
            user_id: comment.user_id,
            item_id: comment.item_id,
            parent_id: comment.parent_id,
            text: comment.text,
            created_at: now,
            updated_at: now,
        };
        comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_comments_by_item(&self, item_id: &str) -> Result<Vec<Comment>, StoreError> {
        let comments = self.comments.lock().await;

        // Reverse first so the stable sort breaks timestamp ties newest-inserted first.
        let mut found: Vec<Comment> = comments
            .iter()
            .rev()
            .filter(|c| c.item_id == item_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
        let comments = self.comments.lock().await;
        Ok(comments.iter().find(|c| c.id == id).cloned())
    }

    async fn update_comment_text(
        &self,
        id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>, StoreError> {
        let mut comments = self.comments.lock().await;
        Ok(comments.iter_mut().find(|c| c.id == id).map(|comment| {
            comment.text = text.to_string();
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut comments = self.comments.lock().await;
        let before = comments.len();
        comments.retain(|c| c.id != id);
        Ok(comments.len() != before)
    }
}
