mod invites;
mod posts;
mod requests;
mod session;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::server::AppState;

pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        // Session routes
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
        // Invite routes
        .route("/invites", get(invites::list_invites))
        // Join request routes
        .route("/requests", get(requests::list_requests))
        .route(
            "/requests/{id}",
            patch(requests::review_request).delete(requests::delete_request),
        )
        .route("/requests/{id}/rank", patch(requests::set_request_rank))
        // Social post routes
        .route("/posts", post(posts::create_post))
        .route(
            "/posts/{id}",
            patch(posts::update_post).delete(posts::delete_post),
        )
}
