pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Comment, Rating, comment::NewComment};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Atomically replaces the value of the rating keyed on `(user_id, item_id)`,
    /// inserting a fresh record when none exists.
    async fn upsert_rating(
        &self,
        user_id: &str,
        item_id: &str,
        value: i32,
    ) -> Result<Rating, StoreError>;

    async fn find_ratings(&self, item_id: Option<&str>) -> Result<Vec<Rating>, StoreError>;

    async fn find_rating(&self, id: Uuid) -> Result<Option<Rating>, StoreError>;

    /// Returns `None` when the record vanished before the write.
    async fn update_rating_value(&self, id: Uuid, value: i32)
    -> Result<Option<Rating>, StoreError>;

    async fn delete_rating(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, StoreError>;

    /// Newest first.
    async fn find_comments_by_item(&self, item_id: &str) -> Result<Vec<Comment>, StoreError>;

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, StoreError>;

    async fn update_comment_text(
        &self,
        id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>, StoreError>;

    async fn delete_comment(&self, id: Uuid) -> Result<bool, StoreError>;
}
