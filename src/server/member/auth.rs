use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
};

use crate::auth::{MemberSession, RequireMember, SESSION_COOKIE, clear_session_cookie, read_cookie};
use crate::membership::{self, ProfilePatch};
use crate::server::AppState;
use crate::server::extract::JsonBody;
use crate::server::dto::{LoginRequest, UserBody};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::types::MemberProfile;

pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> impl IntoResponse {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let secure = state.secure_cookies;
    let (session, account) = tokio::task::spawn_blocking(move || {
        membership::login(state.store.as_ref(), &state.hasher, &req.username, &req.password)
    })
    .await
    .map_err(|e| {
        tracing::error!("Login task failed: {e}");
        ApiError::internal("Failed to sign in")
    })??;

    let cookie = session.cookie(secure).api_err("Failed to create session")?;
    let user = MemberProfile::from(account);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(ApiResponse::success(UserBody { user })),
    ))
}

pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cookie = clear_session_cookie(state.secure_cookies);
    (AppendHeaders([(SET_COOKIE, cookie)]), Json(ApiResponse::done()))
}

pub async fn me(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let session = read_cookie(&headers, SESSION_COOKIE)
        .and_then(MemberSession::decode)
        .ok_or_else(|| ApiError::unauthorized("Not signed in"))?;

    let user = membership::current_user(state.store.as_ref(), &session)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(UserBody { user })))
}

/// Edits the signed-in member's profile and re-issues the session cookie so
/// the displayed name stays current.
pub async fn update_me(
    RequireMember(member): RequireMember,
    State(state): State<Arc<AppState>>,
    JsonBody(patch): JsonBody<ProfilePatch>,
) -> impl IntoResponse {
    let user = membership::update_profile(state.store.as_ref(), &member.account, patch)?;

    let session = MemberSession {
        username: user.username.clone(),
        name: user.name.clone(),
        rank: user.rank,
        ..member.session
    };
    let cookie = session
        .cookie(state.secure_cookies)
        .api_err("Failed to refresh session")?;

    Ok::<_, ApiError>((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(ApiResponse::success(UserBody { user })),
    ))
}
