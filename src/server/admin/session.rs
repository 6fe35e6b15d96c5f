use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
};

use crate::auth::clear_admin_cookie;
use crate::server::AppState;
use crate::server::extract::JsonBody;
use crate::server::dto::AdminLoginRequest;
use crate::server::response::{ApiError, ApiResponse};

pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AdminLoginRequest>,
) -> impl IntoResponse {
    if !state.admin.check_password(&req.password) {
        tracing::warn!("Failed admin login attempt");
        return Err(ApiError::unauthorized("Invalid password"));
    }

    tracing::info!("Admin signed in");
    let cookie = state.admin.cookie(state.secure_cookies);
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(ApiResponse::done())))
}

pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cookie = clear_admin_cookie(state.secure_cookies);
    (AppendHeaders([(SET_COOKIE, cookie)]), Json(ApiResponse::done()))
}
