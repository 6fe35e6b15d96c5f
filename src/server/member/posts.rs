use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::posts;
use crate::server::AppState;
use crate::server::dto::PostList;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

pub async fn list_posts(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let posts = posts::list(state.store.as_ref()).api_err("Failed to list posts")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(PostList { posts })))
}
