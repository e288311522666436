use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

pub mod comment;
pub mod rating;
pub mod user;

pub use comment::Comment;
pub use rating::Rating;
pub use user::Subject;

/// Item ids arrive as strings or as the raw integers the HN API hands out; both become strings.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}
