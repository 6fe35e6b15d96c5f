use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::{Error, Result as StoreResult};

/// Success envelope: `{"ok": true, ...body}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success(body: T) -> Self {
        Self { ok: true, body }
    }
}

impl ApiResponse<Empty> {
    #[must_use]
    pub fn done() -> Self {
        Self::success(Empty {})
    }
}

/// Body for responses that carry nothing besides `ok`.
#[derive(Debug, Serialize)]
pub struct Empty {}

/// API error that converts to a proper HTTP response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "ok": false, "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::BadRequest(msg) | Error::Conflict(msg) => Self::bad_request(msg),
            Error::AlreadyUsed => {
                Self::bad_request("Invite code is invalid or has already been used")
            }
            Error::InvalidStatus(status) => Self::bad_request(format!("Invalid status: {status}")),
            Error::InvalidCredentials => Self::unauthorized("Invalid username or password"),
            Error::PendingApproval => {
                Self::unauthorized("Your membership request is still pending approval")
            }
            Error::Unauthorized => Self::unauthorized("Not signed in"),
            Error::Forbidden(msg) => Self::forbidden(msg),
            Error::InsufficientRank => {
                Self::forbidden("Only verified, OG, or admin members can create a garage")
            }
            Error::NotFound => Self::not_found("Not found"),
            Error::OrphanedInvite(code) => {
                tracing::error!("Invite code {code} left consumed without a join request");
                Self::internal(format!(
                    "Request deleted but invite code {code} could not be released"
                ))
            }
            other => {
                tracing::error!("Request failed: {other}");
                Self::internal(other.to_string())
            }
        }
    }
}

/// Extension trait for converting store results to 500s that name the failed action.
pub trait StoreResultExt<T> {
    fn api_err(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> StoreResultExt<T> for StoreResult<T> {
    fn api_err(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            ApiError::internal(format!("{message}: {e}"))
        })
    }
}
