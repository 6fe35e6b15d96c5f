use std::path::Path;
use std::sync::Arc;

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, Response};
use serde_json::Value;
use spades::auth::AdminGate;
use spades::server::{AppState, create_router};
use spades::store::{SqliteStore, Store};
use tempfile::TempDir;
use tokio::task::JoinHandle;

pub const ADMIN_PASSWORD: &str = "test-admin-secret";
pub const PUBLIC_BASE_URL: &str = "https://spades.test";

pub struct TestServer {
    pub temp_dir: TempDir,
    pub base_url: String,
    pub client: Client,
    server_task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = SqliteStore::new(temp_dir.path().join("spades.db")).expect("open store");
        store.initialize().expect("initialize store");

        let state = Arc::new(AppState::new(
            Arc::new(store),
            AdminGate::new(ADMIN_PASSWORD).expect("admin gate"),
            PUBLIC_BASE_URL,
            false,
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let base_url = format!("http://127.0.0.1:{port}");

        let app = create_router(state);
        let server_task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            temp_dir,
            base_url,
            client: Client::new(),
            server_task,
        }
    }

    pub fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Logs into the admin console and returns the `Cookie` header value.
    pub async fn admin_cookie(&self) -> String {
        let resp = self
            .client
            .post(self.url("/api/admin/login"))
            .json(&serde_json::json!({ "password": ADMIN_PASSWORD }))
            .send()
            .await
            .expect("admin login");
        assert_eq!(resp.status(), 200);
        cookie_from(&resp, "spades_admin_auth").expect("admin cookie")
    }

    pub async fn generate_invite(&self, admin_cookie: &str) -> String {
        let body: Value = self
            .client
            .post(self.url("/api/invites/generate"))
            .header(COOKIE, admin_cookie)
            .send()
            .await
            .expect("generate invite")
            .json()
            .await
            .expect("parse invite");
        body["code"].as_str().expect("invite code").to_string()
    }

    pub async fn join(&self, code: &str, username: &str) -> Response {
        self.client
            .post(self.url("/api/join"))
            .json(&serde_json::json!({
                "inviteCode": code,
                "name": "Test Driver",
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "hunter22",
                "instagram": "@testdriver",
            }))
            .send()
            .await
            .expect("join")
    }

    pub async fn request_id(&self, admin_cookie: &str, username: &str) -> String {
        let body: Value = self
            .client
            .get(self.url("/api/admin/requests"))
            .header(COOKIE, admin_cookie)
            .send()
            .await
            .expect("list requests")
            .json()
            .await
            .expect("parse requests");
        body["requests"]
            .as_array()
            .expect("requests array")
            .iter()
            .find(|r| r["username"] == username)
            .and_then(|r| r["id"].as_str())
            .expect("request id")
            .to_string()
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("login")
    }

    /// Creates an approved member with the given rank and returns their
    /// session `Cookie` header value.
    pub async fn member(&self, admin_cookie: &str, username: &str, rank: &str) -> String {
        let code = self.generate_invite(admin_cookie).await;
        assert_eq!(self.join(&code, username).await.status(), 201);

        let id = self.request_id(admin_cookie, username).await;
        let resp = self
            .client
            .patch(self.url(&format!("/api/admin/requests/{id}")))
            .header(COOKIE, admin_cookie)
            .json(&serde_json::json!({ "status": "approved" }))
            .send()
            .await
            .expect("approve");
        assert_eq!(resp.status(), 200);

        let resp = self
            .client
            .patch(self.url(&format!("/api/admin/requests/{id}/rank")))
            .header(COOKIE, admin_cookie)
            .json(&serde_json::json!({ "rank": rank }))
            .send()
            .await
            .expect("set rank");
        assert_eq!(resp.status(), 200);

        let resp = self.login(username, "hunter22").await;
        assert_eq!(resp.status(), 200);
        cookie_from(&resp, "spades_member_session").expect("session cookie")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server_task.abort();
    }
}

/// Returns `name=value` from the response's `Set-Cookie` headers, ready to
/// send back as a `Cookie` header.
pub fn cookie_from(resp: &Response, name: &str) -> Option<String> {
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{name}=")))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Returns the full `Set-Cookie` header for `name`, attributes included.
pub fn set_cookie_header(resp: &Response, name: &str) -> Option<String> {
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{name}=")))
        .map(str::to_string)
}
