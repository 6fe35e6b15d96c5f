use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::membership::{JoinApplication, requests};
use crate::server::AppState;
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, ApiResponse};

pub async fn submit_request(
    State(state): State<Arc<AppState>>,
    JsonBody(application): JsonBody<JoinApplication>,
) -> impl IntoResponse {
    // Argon2 blocks the thread for the whole hash.
    tokio::task::spawn_blocking(move || {
        requests::submit(state.store.as_ref(), &state.hasher, application)
    })
    .await
    .map_err(|e| {
        tracing::error!("Join request task failed: {e}");
        ApiError::internal("Failed to submit request")
    })??;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::done())))
}
