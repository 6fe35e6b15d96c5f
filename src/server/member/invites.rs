use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::membership::invites;
use crate::server::AppState;
use crate::server::dto::{GeneratedInvite, ValidateParams, ValidateResponse};
use crate::server::response::{ApiError, ApiResponse};

pub async fn generate_invite(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let invite = invites::generate(state.store.as_ref())?;
    let link = invites::invite_link(&state.public_base_url, &invite.code);

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(GeneratedInvite {
            code: invite.code,
            link,
        })),
    ))
}

/// Public check used by the join form. Never errors; anything doubtful is
/// reported as not valid.
pub async fn validate_invite(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ValidateParams>,
) -> impl IntoResponse {
    let valid = params
        .code
        .as_deref()
        .is_some_and(|code| invites::validate(state.store.as_ref(), code));

    Json(ValidateResponse { valid })
}
