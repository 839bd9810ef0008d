#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_api::config::AppConfig;
use todo_api::database::models::Role;
use todo_api::database::{MemoryStore, UserRepository};
use todo_api::state::AppState;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "secret1";

/// The full router over an in-process store
pub struct TestApp {
    router: Router,
    pub store: MemoryStore,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::from_lookup(|name| match name {
            "JWT_SECRET" => Some(JWT_SECRET.to_string()),
            "DATABASE_URL" => Some("postgres://unused/todo".to_string()),
            "FRONTEND_DIR" => Some("tests/fixtures/frontend".to_string()),
            _ => None,
        })
        .expect("test configuration");

        let store = MemoryStore::new();
        let state = AppState::with_memory_store(store.clone(), JWT_SECRET);
        let router = todo_api::app(state.clone(), &config);

        Self { router, store, state }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<TestResponse> {
        self.request(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.request(Method::PUT, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<TestResponse> {
        self.request(Method::DELETE, path, Some(token), None).await
    }

    /// Registers an account and returns its token
    pub async fn register(&self, email: &str) -> Result<String> {
        let res = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "register failed: {:?}", res.body);
        token_of(&res)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TestResponse> {
        self.request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Grants the admin role straight through the store
    pub async fn promote(&self, email: &str) -> Result<()> {
        UserRepository::update_role(&self.store, email, Role::Admin)
            .await?
            .context("no such user")?;
        Ok(())
    }

    pub async fn create_category(&self, token: &str, name: &str) -> Result<String> {
        let res = self
            .post(
                "/api/categories",
                token,
                json!({ "name": name, "description": format!("{} things", name) }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "create category failed: {:?}", res.body);
        id_of(&res)
    }

    pub async fn create_todo(&self, token: &str, title: &str, category: &str) -> Result<String> {
        let res = self
            .post(
                "/api/todos",
                token,
                json!({ "title": title, "description": "to do", "category": category }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "create todo failed: {:?}", res.body);
        id_of(&res)
    }
}

pub fn token_of(res: &TestResponse) -> Result<String> {
    res.body["token"]
        .as_str()
        .map(str::to_string)
        .context("response carries no token")
}

pub fn id_of(res: &TestResponse) -> Result<String> {
    res.body["id"]
        .as_str()
        .map(str::to_string)
        .context("response carries no id")
}
