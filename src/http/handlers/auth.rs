use axum::{Json, extract::State, http::StatusCode};

use crate::{
    errors::AppError,
    http::extract::ValidatedJson,
    models::user::{CredentialsPayload, LoginResponse, SignupResponse},
    state::AppState,
};

fn credentials(payload: CredentialsPayload) -> Result<(String, String), AppError> {
    match (payload.email, payload.password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            Ok((email.trim().to_string(), password))
        }
        _ => Err(AppError::BadRequest("email and password are required".into())),
    }
}

pub async fn signup_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsPayload>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let (email, password) = credentials(payload)?;

    let user = state.identity.sign_up(&email, &password).await.map_err(|e| {
        tracing::error!("Signup error: {}", e);
        e
    })?;

    tracing::info!("User signed up: {}", user.uid);
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    let (email, password) = credentials(payload)?;

    let session = state.identity.sign_in(&email, &password).await.map_err(|e| {
        tracing::error!("Login error: {}", e);
        e
    })?;

    Ok(Json(session))
}
