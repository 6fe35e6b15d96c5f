use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::membership::requests;
use crate::server::AppState;
use crate::server::extract::JsonBody;
use crate::server::dto::{ListRequestsParams, RankRequest, RequestList, ReviewRequest};
use crate::server::response::{ApiError, ApiResponse};

pub async fn list_requests(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListRequestsParams>,
) -> impl IntoResponse {
    let requests = requests::list(state.store.as_ref(), params.status.as_deref())?;

    Ok::<_, ApiError>(Json(ApiResponse::success(RequestList { requests })))
}

pub async fn review_request(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ReviewRequest>,
) -> impl IntoResponse {
    requests::review(state.store.as_ref(), &id, &req.status)?;

    Ok::<_, ApiError>(Json(ApiResponse::done()))
}

pub async fn set_request_rank(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<RankRequest>,
) -> impl IntoResponse {
    requests::set_rank(state.store.as_ref(), &id, &req.rank)?;

    Ok::<_, ApiError>(Json(ApiResponse::done()))
}

pub async fn delete_request(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    requests::withdraw(state.store.as_ref(), &id)?;

    Ok::<_, ApiError>(Json(ApiResponse::done()))
}
