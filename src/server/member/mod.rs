mod auth;
mod garages;
mod invites;
mod join;
mod posts;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::server::AppState;

pub fn member_router() -> Router<Arc<AppState>> {
    Router::new()
        // Invite routes
        .route("/invites/generate", post(invites::generate_invite))
        .route("/invites/validate", get(invites::validate_invite))
        // Membership routes
        .route("/join", post(join::submit_request))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me).patch(auth::update_me))
        // Garage routes
        .route(
            "/garages",
            get(garages::list_garages).post(garages::create_garage),
        )
        .route(
            "/garages/{username}",
            get(garages::get_garage).patch(garages::update_garage),
        )
        .route(
            "/garages/{username}/likes",
            get(garages::get_likes).post(garages::toggle_like),
        )
        .route(
            "/garages/{username}/comments",
            get(garages::list_comments).post(garages::add_comment),
        )
        .route(
            "/garages/{username}/comments/{id}",
            delete(garages::delete_comment),
        )
        // Public social feed
        .route("/posts", get(posts::list_posts))
}
