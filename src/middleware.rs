use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;

// CORS configuration from ALLOWED_ORIGINS; any origin when unset
pub fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    match &config.allowed_origins {
        Some(origins) => {
            let origins = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect::<Vec<_>>();

            tracing::info!("CORS allowed origins: {:?}", origins);
            layer.allow_origin(AllowOrigin::list(origins))
        }
        None => layer.allow_origin(Any),
    }
}

pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}
