use std::sync::Arc;

use crate::{
    db::CommentStore,
    errors::AppError,
    models::{
        Comment, Subject,
        comment::{CreateCommentPayload, NewComment, UpdateCommentPayload},
    },
};

use super::{non_empty, parse_record_id};

const NOT_FOUND: &str = "Comment not found";

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn CommentStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        Self { store }
    }

    /// Always inserts; a subject may leave any number of comments on an item.
    pub async fn create(
        &self,
        subject: &Subject,
        payload: CreateCommentPayload,
    ) -> Result<Comment, AppError> {
        let (Some(item_id), Some(text)) = (non_empty(payload.item_id), non_empty(payload.text))
        else {
            return Err(AppError::BadRequest("itemId and text are required".into()));
        };

        let comment = self
            .store
            .insert_comment(NewComment {
                user_id: subject.id.clone(),
                item_id,
                parent_id: non_empty(payload.parent_id),
                text,
            })
            .await
            .map_err(|e| AppError::store("Could not save comment", e))?;

        tracing::info!(
            "Comment {} created by {} on item {}",
            comment.id,
            subject.id,
            comment.item_id
        );
        Ok(comment)
    }

    pub async fn list(&self, item_id: Option<String>) -> Result<Vec<Comment>, AppError> {
        let item_id = non_empty(item_id)
            .ok_or_else(|| AppError::BadRequest("Missing itemId query parameter".into()))?;

        self.store
            .find_comments_by_item(&item_id)
            .await
            .map_err(|e| AppError::store("Could not fetch comments", e))
    }

    /// Only the text can change. An absent or blank text leaves the comment as it was.
    pub async fn update(
        &self,
        subject: &Subject,
        id: &str,
        payload: UpdateCommentPayload,
    ) -> Result<Comment, AppError> {
        let comment = self
            .load_owned(subject, id, "Could not update comment")
            .await?;

        let Some(text) = non_empty(payload.text) else {
            return Ok(comment);
        };

        let updated = self
            .store
            .update_comment_text(comment.id, &text)
            .await
            .map_err(|e| AppError::store("Could not update comment", e))?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;

        tracing::info!("Comment {} edited by {}", updated.id, subject.id);
        Ok(updated)
    }

    /// Replies pointing at the deleted comment are left in place.
    pub async fn delete(&self, subject: &Subject, id: &str) -> Result<(), AppError> {
        let comment = self
            .load_owned(subject, id, "Could not delete comment")
            .await?;

        let removed = self
            .store
            .delete_comment(comment.id)
            .await
            .map_err(|e| AppError::store("Could not delete comment", e))?;
        if !removed {
            return Err(AppError::NotFound(NOT_FOUND.into()));
        }

        tracing::info!("Comment {} deleted by {}", comment.id, subject.id);
        Ok(())
    }

    async fn load_owned(
        &self,
        subject: &Subject,
        id: &str,
        failure: &'static str,
    ) -> Result<Comment, AppError> {
        let id = parse_record_id(id, NOT_FOUND)?;
        let comment = self
            .store
            .find_comment(id)
            .await
            .map_err(|e| AppError::store(failure, e))?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;

        if comment.user_id != subject.id {
            tracing::warn!(
                "Subject {} attempted to modify comment {} owned by {}",
                subject.id,
                comment.id,
                comment.user_id
            );
            return Err(AppError::Forbidden("Not authorized".into()));
        }

        Ok(comment)
    }
}
