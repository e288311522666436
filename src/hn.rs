//! Read-only proxy over the Hacker News item API and the Algolia search API.

use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct HnClient {
    http: reqwest::Client,
    api_base: String,
    search_base: String,
}

#[derive(Deserialize)]
struct SearchReply {
    hits: Vec<Value>,
}

impl HnClient {
    pub fn new(
        http: reqwest::Client,
        api_base: impl Into<String>,
        search_base: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            search_base: search_base.into(),
        }
    }

    /// Fetches the id list, then every story detail concurrently. Results keep
    /// the id list order; one failed fetch fails the whole call.
    pub async fn top_stories(&self, limit: usize) -> Result<Vec<Value>, AppError> {
        let ids: Vec<Value> = self
            .get_json(&format!("{}/topstories.json", self.api_base))
            .await
            .map_err(|e| AppError::upstream("Failed to fetch top stories", e))?;

        let fetches = ids.iter().take(limit).map(|id| {
            let url = format!("{}/item/{}.json", self.api_base, id_segment(id));
            async move { self.get_json::<Value>(&url).await }
        });

        let stories = try_join_all(fetches)
            .await
            .map_err(|e| AppError::upstream("Failed to fetch top stories", e))?;

        tracing::debug!("Fetched {} top stories", stories.len());
        Ok(stories)
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Value>, AppError> {
        let hits_per_page = limit.to_string();
        let res = self
            .http
            .get(format!("{}/search", self.search_base))
            .query(&[("query", query), ("hitsPerPage", hits_per_page.as_str())])
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| AppError::upstream("Search failed", e))?;

        let reply: SearchReply = res
            .json()
            .await
            .map_err(|e| AppError::upstream("Search failed", e))?;

        Ok(reply.hits)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> reqwest::Result<T> {
        self.http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }
}

fn id_segment(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads a leading base-10 integer the way a lenient query parser would:
/// leading whitespace and a sign are accepted, trailing junk is ignored.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Positive values are capped at the maximum; anything else falls back to the default.
pub fn top_stories_limit(raw: Option<&str>) -> usize {
    match raw.and_then(parse_leading_int) {
        Some(n) if n > 0 => (n as u64).min(MAX_LIMIT as u64) as usize,
        _ => DEFAULT_LIMIT,
    }
}

/// Numeric values are clamped into `1..=MAX_LIMIT`; non-numeric falls back to the default.
pub fn search_limit(raw: Option<&str>) -> usize {
    match raw.and_then(parse_leading_int) {
        Some(n) => n.clamp(1, MAX_LIMIT as i64) as usize,
        None => DEFAULT_LIMIT,
    }
}
