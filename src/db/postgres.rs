use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

use super::{CommentStore, RatingStore, StoreError};
use crate::models::{Comment, Rating, comment::NewComment};

const RATING_COLUMNS: &str = "id, user_id, item_id, value, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, user_id, item_id, parent_id, text, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and applies the bundled migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Connected to Postgres and applied migrations");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl RatingStore for PgStore {
    async fn upsert_rating(
        &self,
        user_id: &str,
        item_id: &str,
        value: i32,
    ) -> Result<Rating, StoreError> {
        let rating = sqlx::query_as::<_, Rating>(&format!(
            "INSERT INTO ratings (id, user_id, item_id, value)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, item_id)
            DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            RETURNING {RATING_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(item_id)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        Ok(rating)
    }

    async fn find_ratings(&self, item_id: Option<&str>) -> Result<Vec<Rating>, StoreError> {
        let ratings = match item_id {
            Some(item_id) => {
                sqlx::query_as::<_, Rating>(&format!(
                    "SELECT {RATING_COLUMNS} FROM ratings WHERE item_id = $1 ORDER BY created_at"
                ))
                .bind(item_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Rating>(&format!(
                    "SELECT {RATING_COLUMNS} FROM ratings ORDER BY created_at"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(ratings)
    }

    async fn find_rating(&self, id: Uuid) -> Result<Option<Rating>, StoreError> {
        let rating = sqlx::query_as::<_, Rating>(&format!(
            "SELECT {RATING_COLUMNS} FROM ratings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rating)
    }

    async fn update_rating_value(
        &self,
        id: Uuid,
        value: i32,
    ) -> Result<Option<Rating>, StoreError> {
        let rating = sqlx::query_as::<_, Rating>(&format!(
            "UPDATE ratings SET value = $2, updated_at = now()
            WHERE id = $1
            RETURNING {RATING_COLUMNS}"
        ))
        .bind(id)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rating)
    }

    async fn delete_rating(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM ratings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (id, user_id, item_id, parent_id, text)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&comment.user_id)
        .bind(&comment.item_id)
        .bind(&comment.parent_id)
        .bind(&comment.text)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn find_comments_by_item(&self, item_id: &str) -> Result<Vec<Comment>, StoreError> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments
            WHERE item_id = $1
            ORDER BY created_at DESC, seq DESC"
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn update_comment_text(
        &self,
        id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments SET text = $2, updated_at = clock_timestamp()
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// These run against a live database and are skipped when DATABASE_URL is unset.
#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> Option<PgStore> {
        let url = std::env::var("DATABASE_URL").ok()?;
        Some(PgStore::connect(&url).await.unwrap())
    }

    fn unique(prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4())
    }

    #[tokio::test]
    async fn upsert_replaces_the_value_in_place() {
        let Some(store) = store().await else {
            return;
        };
        let user = unique("user");
        let item = unique("item");

        let first = store.upsert_rating(&user, &item, 3).await.unwrap();
        let second = store.upsert_rating(&user, &item, 5).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.value, 5);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);

        let rows = store.find_ratings(Some(item.as_str())).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, 5);

        let other = store.upsert_rating(&unique("user"), &item, 1).await.unwrap();
        assert_ne!(other.id, first.id);
        assert_eq!(store.find_ratings(Some(item.as_str())).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn updates_refresh_updated_at() {
        let Some(store) = store().await else {
            return;
        };
        let rating = store
            .upsert_rating(&unique("user"), &unique("item"), 2)
            .await
            .unwrap();

        let updated = store
            .update_rating_value(rating.id, 4)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.value, 4);
        assert!(updated.updated_at >= rating.updated_at);

        assert!(store.delete_rating(rating.id).await.unwrap());
        assert!(store.find_rating(rating.id).await.unwrap().is_none());
        assert!(store.update_rating_value(rating.id, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn comments_list_newest_first() {
        let Some(store) = store().await else {
            return;
        };
        let item = unique("item");

        for text in ["one", "two", "three"] {
            store
                .insert_comment(NewComment {
                    user_id: "user-a".into(),
                    item_id: item.clone(),
                    parent_id: None,
                    text: text.into(),
                })
                .await
                .unwrap();
        }

        let texts: Vec<String> = store
            .find_comments_by_item(&item)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["three", "two", "one"]);

        let first = store.find_comments_by_item(&item).await.unwrap()[0].clone();
        let edited = store
            .update_comment_text(first.id, "edited")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(edited.text, "edited");
        assert!(edited.updated_at >= first.updated_at);
    }
}
