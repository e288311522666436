use std::time::Duration;

use crate::errors::AppError;

pub const DEFAULT_HN_API_BASE: &str = "https://hacker-news.firebaseio.com/v0";
pub const DEFAULT_HN_SEARCH_BASE: &str = "http://hn.algolia.com/api/v1";
pub const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Process-wide settings, resolved once at startup and handed to each component.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub hn_api_base: String,
    pub hn_search_base: String,
    pub identity_toolkit_url: String,
    pub firebase_api_key: Option<String>,
    pub jwt_secret: Option<String>,
    pub allowed_origins: Option<Vec<String>>,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("Invalid PORT '{raw}': {e}")))?,
            None => 5000,
        };

        let upstream_timeout = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("Invalid UPSTREAM_TIMEOUT_SECS '{raw}': {e}"))
            })?),
            None => Duration::from_secs(10),
        };

        let allowed_origins = var("ALLOWED_ORIGINS").map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        });

        Ok(Self {
            port,
            database_url: var("DATABASE_URL"),
            hn_api_base: trim_base(var("HN_API_BASE").unwrap_or_else(|| DEFAULT_HN_API_BASE.into())),
            hn_search_base: trim_base(
                var("HN_SEARCH_BASE").unwrap_or_else(|| DEFAULT_HN_SEARCH_BASE.into()),
            ),
            identity_toolkit_url: trim_base(
                var("IDENTITY_TOOLKIT_URL").unwrap_or_else(|| DEFAULT_IDENTITY_TOOLKIT_URL.into()),
            ),
            firebase_api_key: var("FIREBASE_API_KEY"),
            jwt_secret: var("JWT_SECRET"),
            allowed_origins,
            upstream_timeout,
        })
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
