use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    errors::AppError,
    models::{Subject, user::Claims},
    state::AppState,
};

/// Resolves a raw bearer token into the subject it was issued to.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Subject, AppError>;
}

/// Extractor guarding mutating routes. Rejects before the verifier is consulted
/// when the `Authorization: Bearer <token>` header is missing or malformed.
pub struct AuthSubject(pub Subject);

impl FromRequestParts<AppState> for AuthSubject {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthenticated("Missing or malformed token".into()))?;

        let subject = state.verifier.verify(bearer.token()).await?;
        tracing::debug!("Authenticated subject {}", subject.id);

        Ok(Self(subject))
    }
}

/// Verifies HS256 tokens signed with a shared secret.
pub struct JwtVerifier {
    secret: String,
}

impl JwtVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn issue(&self, user_id: &str, email: Option<&str>) -> Result<String, AppError> {
        let expiration = (Utc::now() + Duration::hours(24)).timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Config(format!("Failed to sign token: {e}")))
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Subject, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            tracing::warn!("Token verify error: {}", e);
            AppError::Unauthenticated("Invalid or expired token".into())
        })?;

        Ok(Subject {
            id: token_data.claims.sub,
            email: token_data.claims.email,
        })
    }
}
