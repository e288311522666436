pub mod comments;
pub mod ratings;

use uuid::Uuid;

use crate::errors::AppError;

pub use comments::CommentService;
pub use ratings::RatingService;

/// Ids are store-assigned UUIDs; anything else cannot name a record.
fn parse_record_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(not_found.into()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
