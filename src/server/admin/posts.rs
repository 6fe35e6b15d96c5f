use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::posts::{self, PostDraft, PostPatch};
use crate::server::AppState;
use crate::server::extract::JsonBody;
use crate::server::dto::PostBody;
use crate::server::response::{ApiError, ApiResponse};

pub async fn create_post(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    JsonBody(draft): JsonBody<PostDraft>,
) -> impl IntoResponse {
    let post = posts::create(state.store.as_ref(), draft)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(PostBody { post }))))
}

pub async fn update_post(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<PostPatch>,
) -> impl IntoResponse {
    let post = posts::update(state.store.as_ref(), &id, patch)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(PostBody { post })))
}

pub async fn delete_post(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    posts::delete(state.store.as_ref(), &id)?;

    Ok::<_, ApiError>(Json(ApiResponse::done()))
}
