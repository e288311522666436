#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use hn_ratings_be::{
    app,
    auth::{IdentityVerifier, JwtVerifier},
    config::Config,
    db::MemoryStore,
    hn::HnClient,
    identity::IdentityToolkit,
    state::AppState,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

// Nothing listens here; any call to it fails fast.
pub const DEAD_BASE: &str = "http://127.0.0.1:9";

pub struct TestApp {
    pub router: Router,
    pub jwt: JwtVerifier,
}

pub struct Remotes {
    pub hn_api: String,
    pub hn_search: String,
    pub identity: String,
}

impl Default for Remotes {
    fn default() -> Self {
        Self {
            hn_api: DEAD_BASE.into(),
            hn_search: DEAD_BASE.into(),
            identity: DEAD_BASE.into(),
        }
    }
}

fn test_config() -> Config {
    Config::from_lookup(|_| None).unwrap()
}

fn clients(remotes: &Remotes) -> (HnClient, IdentityToolkit) {
    let http = reqwest::Client::new();
    (
        HnClient::new(http.clone(), &remotes.hn_api, &remotes.hn_search),
        IdentityToolkit::new(http, &remotes.identity, Some("test-key".into())),
    )
}

/// Router over a fresh in-memory store, verifying tokens locally.
pub fn test_app(remotes: Remotes) -> TestApp {
    let (hn, identity) = clients(&remotes);
    let verifier: Arc<dyn IdentityVerifier> = Arc::new(JwtVerifier::new(SECRET));
    let state = AppState::new(Arc::new(MemoryStore::new()), verifier, hn, identity);

    TestApp {
        router: app(state, &test_config()),
        jwt: JwtVerifier::new(SECRET),
    }
}

/// Router that verifies tokens against the (stubbed) identity provider.
pub fn remote_verified_app(remotes: Remotes) -> Router {
    let (hn, identity) = clients(&remotes);
    let verifier: Arc<dyn IdentityVerifier> = Arc::new(identity.clone());
    let state = AppState::new(Arc::new(MemoryStore::new()), verifier, hn, identity);
    app(state, &test_config())
}

impl TestApp {
    pub fn token(&self, user_id: &str) -> String {
        self.jwt.issue(user_id, None).unwrap()
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let token = user.map(|u| self.token(u));
        send(&self.router, method, uri, token.as_deref(), body).await
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(router, request).await
}

pub async fn send_request(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}
