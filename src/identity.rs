use async_trait::async_trait;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{
    auth::IdentityVerifier,
    errors::AppError,
    models::{
        Subject,
        user::{LoginResponse, SignupResponse},
    },
};

const PROVIDER_UNAVAILABLE: &str = "Identity provider unavailable";

/// REST client for the identity provider's account endpoints.
#[derive(Debug, Clone)]
pub struct IdentityToolkit {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpReply {
    local_id: String,
    email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInReply {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    local_id: String,
}

#[derive(Deserialize)]
struct LookupReply {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
}

impl IdentityToolkit {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignupResponse, AppError> {
        let reply: SignUpReply = self
            .call(
                "accounts:signUp",
                json!({ "email": email, "password": password }),
            )
            .await?;

        Ok(SignupResponse {
            uid: reply.local_id,
            email: reply.email,
        })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let reply: SignInReply = self
            .call(
                "accounts:signInWithPassword",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;

        Ok(LoginResponse {
            id_token: reply.id_token,
            refresh_token: reply.refresh_token,
            expires_in: reply.expires_in,
            local_id: reply.local_id,
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: Value) -> Result<T, AppError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            tracing::error!("FIREBASE_API_KEY is not set; cannot call {}", method);
            AppError::Identity(PROVIDER_UNAVAILABLE.into())
        })?;

        let url = format!("{}/{}", self.base_url, method);
        let res = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // The request URL carries the API key; keep it out of logs and responses.
                tracing::error!("Identity provider request failed: {}", e.without_url());
                AppError::Identity(PROVIDER_UNAVAILABLE.into())
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let payload: Value = res.json().await.unwrap_or(Value::Null);
            let message = payload
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Identity provider returned {status}"));
            return Err(AppError::Identity(message));
        }

        res.json::<T>().await.map_err(|e| {
            tracing::error!(
                "Invalid identity provider response to {}: {}",
                method,
                e.without_url()
            );
            AppError::Identity(PROVIDER_UNAVAILABLE.into())
        })
    }
}

#[async_trait]
impl IdentityVerifier for IdentityToolkit {
    async fn verify(&self, token: &str) -> Result<Subject, AppError> {
        let reply: LookupReply = self
            .call("accounts:lookup", json!({ "idToken": token }))
            .await
            .map_err(|e| {
                tracing::warn!("Token verify error: {}", e);
                AppError::Unauthenticated("Invalid or expired token".into())
            })?;

        let user = reply
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Unauthenticated("Invalid or expired token".into()))?;

        Ok(Subject {
            id: user.local_id,
            email: user.email,
        })
    }
}
