use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::admin::ADMIN_COOKIE;
use super::helpers::read_cookie;
use super::session::{MemberSession, SESSION_COOKIE};
use crate::server::AppState;
use crate::types::{JoinRequest, RequestStatus};

/// Extractor that requires the admin cookie
pub struct RequireAdmin;

/// An approved member, resolved from the session cookie.
///
/// `account` is the live record fetched on every request; authorization
/// decisions use it rather than the cookie contents.
pub struct Member {
    pub session: MemberSession,
    pub account: JoinRequest,
}

/// Extractor that requires a signed-in, approved member
pub struct RequireMember(pub Member);

/// Extractor for routes that behave differently for signed-in members
pub struct OptionalMember(pub Option<Member>);

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    NotSignedIn,
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::NotSignedIn => (StatusCode::UNAUTHORIZED, "Not signed in".to_string()),
            AuthError::InternalError(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        let body = json!({ "ok": false, "error": message });

        (status, Json(body)).into_response()
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let cookie = read_cookie(&parts.headers, ADMIN_COOKIE).ok_or(AuthError::Unauthorized)?;

        if !state.admin.check_cookie(cookie) {
            return Err(AuthError::Unauthorized);
        }

        Ok(RequireAdmin)
    }
}

impl FromRequestParts<Arc<AppState>> for RequireMember {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let member = resolve_member(parts, state)?;
        Ok(RequireMember(member))
    }
}

impl FromRequestParts<Arc<AppState>> for OptionalMember {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match resolve_member(parts, state) {
            Ok(member) => Ok(OptionalMember(Some(member))),
            Err(AuthError::InternalError(message)) => Err(AuthError::InternalError(message)),
            Err(_) => Ok(OptionalMember(None)),
        }
    }
}

fn resolve_member(parts: &Parts, state: &Arc<AppState>) -> Result<Member, AuthError> {
    let raw = read_cookie(&parts.headers, SESSION_COOKIE).ok_or(AuthError::NotSignedIn)?;
    let session = MemberSession::decode(raw).ok_or(AuthError::NotSignedIn)?;

    let account = state
        .store
        .get_join_request(&session.id)
        .map_err(|e| {
            tracing::error!("Failed to load member {}: {e}", session.id);
            AuthError::InternalError(e.to_string())
        })?
        .ok_or(AuthError::NotSignedIn)?;

    if account.status != RequestStatus::Approved {
        return Err(AuthError::NotSignedIn);
    }

    Ok(Member { session, account })
}
