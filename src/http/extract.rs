use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

/// `Json` whose rejection renders as a JSON `400` like every other error.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ValidatedJson<T>(pub T);

/// `Query` with the same JSON rejection.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ValidatedQuery<T>(pub T);
