use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};

use super::admin::admin_router;
use super::member::member_router;
use crate::auth::{AdminGate, CredentialHasher};
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub hasher: CredentialHasher,
    pub admin: AdminGate,
    /// Base URL used when building invite links, e.g. "https://spades.example.com".
    pub public_base_url: String,
    /// Adds `Secure` to every cookie the server sets.
    pub secure_cookies: bool,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        admin: AdminGate,
        public_base_url: impl Into<String>,
        secure_cookies: bool,
    ) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            store,
            hasher: CredentialHasher::new(),
            admin,
            public_base_url,
            secure_cookies,
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/admin", admin_router())
        .nest("/api", member_router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{
        Request, StatusCode,
        header::{CONTENT_TYPE, COOKIE},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::store::SqliteStore;

    fn router() -> Router {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();
        let state = AppState::new(
            Arc::new(store),
            AdminGate::new("garage-night").unwrap(),
            "https://spades.example.com/",
            false,
        );
        assert_eq!(state.public_base_url, "https://spades.example.com");
        create_router(Arc::new(state))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_routes_reject_missing_cookie() {
        let response = router()
            .oneshot(
                Request::post("/api/invites/generate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "ok": false, "error": "Unauthorized" })
        );
    }

    #[tokio::test]
    async fn test_generate_with_admin_cookie() {
        let gate = AdminGate::new("garage-night").unwrap();
        let set_cookie = gate.cookie(false);
        let cookie = set_cookie.split(';').next().unwrap();

        let response = router()
            .oneshot(
                Request::post("/api/invites/generate")
                    .header(COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let code = body["code"].as_str().unwrap();
        assert_eq!(
            body["link"],
            format!("https://spades.example.com/join?code={code}")
        );
    }

    #[tokio::test]
    async fn test_withdraw_reports_orphaned_invite_code() {
        use crate::auth::CredentialHasher;
        use crate::membership::requests::tests::{FailingInviteStore, application};
        use crate::membership::{invites, requests};

        let mut store = FailingInviteStore::new(SqliteStore::in_memory().unwrap());
        store.initialize().unwrap();
        let invite = invites::generate(&store).unwrap();
        let request =
            requests::submit(&store, &CredentialHasher::new(), application(&invite.code, "driver"))
                .unwrap();
        store.fail_release = true;

        let gate = AdminGate::new("garage-night").unwrap();
        let set_cookie = gate.cookie(false);
        let cookie = set_cookie.split(';').next().unwrap().to_string();
        let app = create_router(Arc::new(AppState::new(
            Arc::new(store),
            gate,
            "https://spades.example.com",
            false,
        )));

        let response = app
            .oneshot(
                Request::delete(format!("/api/admin/requests/{}", request.id))
                    .header(COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["ok"], false);
        assert!(body["error"].as_str().unwrap().contains(&invite.code));
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let response = router()
            .oneshot(
                Request::post("/api/auth/login")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"username":42}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["ok"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_me_without_session() {
        let response = router()
            .oneshot(Request::get("/api/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["ok"], false);
    }
}
