use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistence failure. The first field is shown to the caller, the second is only logged.
    #[error("Store error: {1}")]
    Store(&'static str, String),

    /// Remote content API failure. Same split as `Store`.
    #[error("Upstream error: {1}")]
    Upstream(&'static str, String),

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl AppError {
    pub fn store(public: &'static str, err: impl std::fmt::Display) -> Self {
        AppError::Store(public, err.to_string())
    }

    pub fn upstream(public: &'static str, err: impl std::fmt::Display) -> Self {
        AppError::Upstream(public, err.to_string())
    }

    pub fn to_response(&self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Store(public, _) => (StatusCode::INTERNAL_SERVER_ERROR, (*public).into()),
            AppError::Upstream(public, _) => (StatusCode::BAD_GATEWAY, (*public).into()),
            AppError::Identity(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".into(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store(..) | AppError::Upstream(..) | AppError::Config(_) => {
                tracing::error!("{}", self)
            }
            _ => tracing::debug!("Request rejected: {}", self),
        }

        let (status, message) = self.to_response();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
