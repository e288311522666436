use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    http::handlers::{
        auth::{login_handler, signup_handler},
        comments::{
            create_comment_handler, delete_comment_handler, list_comments_handler,
            update_comment_handler,
        },
        hn::{search_handler, top_stories_handler},
        ratings::{
            create_rating_handler, delete_rating_handler, get_rating_handler,
            list_ratings_handler, update_rating_handler,
        },
    },
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup_handler))
        .route("/api/auth/login", post(login_handler))
        .route(
            "/api/ratings",
            post(create_rating_handler).get(list_ratings_handler),
        )
        .route(
            "/api/ratings/{id}",
            get(get_rating_handler)
                .put(update_rating_handler)
                .delete(delete_rating_handler),
        )
        .route(
            "/api/comments",
            post(create_comment_handler).get(list_comments_handler),
        )
        .route(
            "/api/comments/{id}",
            put(update_comment_handler).delete(delete_comment_handler),
        )
        .route("/api/topstories", get(top_stories_handler))
        .route("/api/search", get(search_handler))
        .with_state(state)
}
