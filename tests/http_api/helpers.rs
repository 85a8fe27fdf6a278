//! Shared harness for HTTP integration tests.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        Method, Request, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use chrono::Duration;
use rstest::fixture;
use serde_json::{Value, json};
use task_todo::{
    api::{AppState, create_router},
    identity::{
        adapters::{
            credentials::{BcryptPasswordHasher, JwtTokenCodec},
            memory::InMemoryUserRepository,
        },
        domain::{Role, User, Username},
        ports::UserRepository,
        services::DEFAULT_PASSWORD,
    },
    task::adapters::memory::InMemoryTaskRepository,
};
use tower::ServiceExt;

/// Secret used to sign tokens in tests.
pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Router over in-memory adapters with one account per role plus a second
/// leader.
pub struct TestApp {
    router: Router,
    users: Arc<InMemoryUserRepository>,
}

/// A decoded JSON response.
#[derive(Debug)]
pub struct JsonResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Builds a router with test accounts and empty task storage.
#[fixture]
pub fn app() -> TestApp {
    let hasher = Arc::new(BcryptPasswordHasher::new(4));
    let hash = bcrypt::hash(DEFAULT_PASSWORD, 4).expect("hashing should succeed");
    let users = Arc::new(InMemoryUserRepository::with_users(
        [
            ("pelaksana1", Role::Pelaksana),
            ("leader1", Role::Leader),
            ("leader2", Role::Leader),
            ("manager1", Role::Manager),
        ]
        .map(|(name, role)| {
            User::new(
                Username::new(name).expect("valid username"),
                hash.clone(),
                role,
            )
        }),
    ));

    let state = AppState::new(
        Arc::clone(&users) as Arc<dyn UserRepository>,
        Arc::new(InMemoryTaskRepository::new()),
        hasher,
        Arc::new(JwtTokenCodec::new(TEST_SECRET, Duration::hours(1))),
    );
    TestApp {
        router: create_router(state),
        users,
    }
}

impl TestApp {
    /// Sends a request and decodes the JSON body (`Value::Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> JsonResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(bearer) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {bearer}"));
        }
        let request = match body {
            Some(payload) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be JSON")
        };
        JsonResponse { status, body }
    }

    /// Logs in with the seeded password and returns the bearer token.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "username": username, "password": DEFAULT_PASSWORD })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.body["token"]
            .as_str()
            .expect("token should be a string")
            .to_owned()
    }

    /// Returns the identifier of a seeded account.
    pub async fn user_id(&self, username: &str) -> String {
        let name = Username::new(username).expect("valid username");
        self.users
            .find_by_username(&name)
            .await
            .expect("lookup should succeed")
            .expect("seeded user should exist")
            .id()
            .to_string()
    }

    /// Creates a task as `pelaksana1` assigned to `leader1`.
    pub async fn create_task(&self, token: &str, title: &str) -> Value {
        let leader = self.user_id("leader1").await;
        let response = self
            .send(
                Method::POST,
                "/tasks",
                Some(token),
                Some(json!({
                    "title": title,
                    "description": "created in tests",
                    "assignee_id": leader,
                    "due_date": "2026-06-30 17:00:00.000",
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "create failed: {:?}", response.body);
        response.body["task"].clone()
    }
}

/// Returns the `id` field of a task JSON object.
pub fn task_id(task: &Value) -> String {
    task["id"].as_str().expect("task id should be a string").to_owned()
}

/// Returns the `histories` array length of a task JSON object.
pub fn history_len(task: &Value) -> usize {
    task["histories"].as_array().map_or(0, Vec::len)
}
