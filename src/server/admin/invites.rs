use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::auth::RequireAdmin;
use crate::membership::invites;
use crate::server::AppState;
use crate::server::dto::InviteList;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

pub async fn list_invites(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let invites = invites::list(state.store.as_ref()).api_err("Failed to list invite codes")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(InviteList { invites })))
}
