use std::sync::Arc;

use crate::{
    auth::{IdentityVerifier, JwtVerifier},
    config::Config,
    db::{CommentStore, MemoryStore, PgStore, RatingStore},
    errors::AppError,
    hn::HnClient,
    identity::IdentityToolkit,
    services::{CommentService, RatingService},
};

#[derive(Clone)]
pub struct AppState {
    pub ratings: RatingService,
    pub comments: CommentService,
    pub hn: HnClient,
    pub identity: IdentityToolkit,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new<S>(
        store: Arc<S>,
        verifier: Arc<dyn IdentityVerifier>,
        hn: HnClient,
        identity: IdentityToolkit,
    ) -> Self
    where
        S: RatingStore + CommentStore + 'static,
    {
        Self {
            ratings: RatingService::new(store.clone()),
            comments: CommentService::new(store),
            hn,
            identity,
            verifier,
        }
    }

    /// Wires every component from the resolved configuration.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;

        let hn = HnClient::new(
            http.clone(),
            config.hn_api_base.clone(),
            config.hn_search_base.clone(),
        );
        let identity = IdentityToolkit::new(
            http,
            config.identity_toolkit_url.clone(),
            config.firebase_api_key.clone(),
        );

        let verifier: Arc<dyn IdentityVerifier> = match &config.jwt_secret {
            Some(secret) => {
                tracing::info!("Verifying bearer tokens locally (HS256)");
                Arc::new(JwtVerifier::new(secret.clone()))
            }
            None => {
                if config.firebase_api_key.is_none() {
                    tracing::warn!(
                        "Neither JWT_SECRET nor FIREBASE_API_KEY is set; authenticated routes will reject every request"
                    );
                }
                Arc::new(identity.clone())
            }
        };

        let state = match &config.database_url {
            Some(url) => {
                let store = PgStore::connect(url).await.map_err(|e| {
                    AppError::Config(format!("Failed to connect to database: {e}"))
                })?;
                Self::new(Arc::new(store), verifier, hn, identity)
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using the in-memory store");
                Self::new(Arc::new(MemoryStore::new()), verifier, hn, identity)
            }
        };

        Ok(state)
    }
}
