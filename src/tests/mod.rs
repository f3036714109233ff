// tasktracker-service/src/tests/mod.rs
//
// HTTP-level tests: the real route table over an in-memory store, with a
// mailer that keeps sent messages for inspection.
use crate::config::{AppConfig, AuthMode};
use crate::models::{CreateWorkspaceRequest, MembershipRole, RegisterRequest};
use crate::services::email_service::MemoryMailer;
use crate::services::AppState;
use crate::utils::Store;
use actix_web::http::header;
use actix_web::{test, web};
use std::sync::Arc;

mod project_tests;
mod task_tests;

// Build the service under test from a TestContext
macro_rules! init_app {
    ($ctx:expr) => {{
        let state = $ctx.state.clone();
        actix_web::test::init_service(
            actix_web::App::new().configure(move |cfg| crate::routes::configure(cfg, state)),
        )
        .await
    }};
}

// Call the app and return (status, headers, json body)
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = actix_web::test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, headers, json)
    }};
}

pub(crate) use init_app;
pub(crate) use send;

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub mailer: MemoryMailer,
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

pub fn test_config(mode: AuthMode) -> AppConfig {
    AppConfig {
        jwt_secret: "test-secret".to_string(),
        auth_mode: mode,
        storage_path: None,
        bcrypt_cost: 4,
        ..AppConfig::default()
    }
}

pub fn context_with_mode(mode: AuthMode) -> TestContext {
    let mailer = MemoryMailer::new();
    let state = AppState::new(test_config(mode), Store::in_memory(), Arc::new(mailer.clone()));
    TestContext {
        state: web::Data::new(state),
        mailer,
    }
}

pub fn context() -> TestContext {
    context_with_mode(AuthMode::Password)
}

impl TestContext {
    // Registers straight through the service; returns an access token
    pub fn user(&self, email: &str) -> TestUser {
        let response = self
            .state
            .auth
            .register(RegisterRequest {
                email: email.to_string(),
                password: "password1".to_string(),
                name: None,
                invite_token: None,
            })
            .unwrap();
        TestUser {
            id: response.user.id,
            email: response.user.email,
            token: response.tokens.access_token,
        }
    }

    pub fn workspace(&self, owner: &TestUser, name: &str) -> String {
        self.state
            .workspaces
            .create(
                &owner.id,
                CreateWorkspaceRequest {
                    name: name.to_string(),
                    description: None,
                },
            )
            .unwrap()
            .workspace
            .id
    }

    pub fn join(&self, workspace_id: &str, owner: &TestUser, member: &TestUser, role: MembershipRole) -> String {
        self.state
            .memberships
            .add_member(&owner.id, workspace_id, &member.email, role)
            .unwrap()
            .membership
            .id
    }
}

pub fn as_user(req: test::TestRequest, user: &TestUser) -> test::TestRequest {
    req.insert_header((header::AUTHORIZATION, format!("Bearer {}", user.token)))
}

pub fn content_range(headers: &actix_web::http::header::HeaderMap) -> String {
    headers
        .get(header::CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// ?filter=...&sort=...&range=... with each value JSON encoded
pub fn list_uri(path: &str, filter: serde_json::Value, range: Option<(usize, usize)>) -> String {
    let mut uri = format!("{}?filter={}", path, encode(&filter.to_string()));
    if let Some((start, end)) = range {
        uri.push_str(&format!("&range={}", encode(&format!("[{},{}]", start, end))));
    }
    uri
}

fn encode(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}
