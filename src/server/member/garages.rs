use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::{OptionalMember, RequireMember};
use crate::garage::{self, GarageDraft, GaragePatch};
use crate::server::AppState;
use crate::server::extract::JsonBody;
use crate::server::dto::{CommentBody, CommentList, CommentRequest, GarageBody, GarageList};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

pub async fn list_garages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let garages = garage::list(state.store.as_ref()).api_err("Failed to list garages")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(GarageList { garages })))
}

pub async fn create_garage(
    RequireMember(member): RequireMember,
    State(state): State<Arc<AppState>>,
    JsonBody(draft): JsonBody<GarageDraft>,
) -> impl IntoResponse {
    let garage = garage::create(state.store.as_ref(), &member.account, draft)?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(GarageBody { garage })),
    ))
}

pub async fn get_garage(
    OptionalMember(viewer): OptionalMember,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    let viewer = viewer.as_ref().map(|m| &m.account);
    let garage = garage::read(state.store.as_ref(), &username, viewer)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(GarageBody { garage })))
}

pub async fn update_garage(
    RequireMember(member): RequireMember,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    JsonBody(patch): JsonBody<GaragePatch>,
) -> impl IntoResponse {
    let garage = garage::update(state.store.as_ref(), &username, &member.account, patch)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(GarageBody { garage })))
}

pub async fn get_likes(
    OptionalMember(viewer): OptionalMember,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    let viewer = viewer.as_ref().map(|m| &m.account);
    let summary = garage::like_summary(state.store.as_ref(), &username, viewer)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(summary)))
}

pub async fn toggle_like(
    RequireMember(member): RequireMember,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    let summary = garage::toggle_like(state.store.as_ref(), &username, &member.account)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(summary)))
}

pub async fn list_comments(
    OptionalMember(viewer): OptionalMember,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    let viewer = viewer.as_ref().map(|m| &m.account);
    let comments = garage::comments(state.store.as_ref(), &username, viewer)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(CommentList { comments })))
}

pub async fn add_comment(
    RequireMember(member): RequireMember,
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    JsonBody(req): JsonBody<CommentRequest>,
) -> impl IntoResponse {
    let comment = garage::add_comment(state.store.as_ref(), &username, &member.account, &req.body)?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(CommentBody { comment })),
    ))
}

pub async fn delete_comment(
    RequireMember(member): RequireMember,
    State(state): State<Arc<AppState>>,
    Path((username, id)): Path<(String, String)>,
) -> impl IntoResponse {
    garage::delete_comment(state.store.as_ref(), &username, &id, &member.account)?;

    Ok::<_, ApiError>(Json(ApiResponse::done()))
}
