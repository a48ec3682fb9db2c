//! Common test utilities for integration tests
//!
//! Tests drive the full router (auth, layers, handlers) over the in-memory
//! store, so no external services are needed:
//! - Test configuration with cheap password hashing
//! - An admin user and its bearer token
//! - Request and JSON body helpers

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, PasswordConfig};
use taskboard_shared::auth::jwt::{create_token, Claims};
use taskboard_shared::models::user::{CreateUser, User};
use taskboard_shared::repository::{InMemoryStore, UserRepository};
use std::sync::Arc;
use tower::Service as _;

pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: InMemoryStore,
    pub state: AppState,
    pub app: Router,
    pub admin: User,
    pub jwt_token: String,
}

/// Configuration for tests; hashing is cheap so tests stay fast
pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
            json_logs: false,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_ttl_secs: 900,
        },
        password: PasswordConfig {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        },
        bootstrap: None,
    }
}

impl TestContext {
    /// Creates a context with an empty store apart from one admin user
    pub async fn new() -> anyhow::Result<Self> {
        let store = InMemoryStore::new();
        let state = AppState::new(test_config(), Arc::new(store.clone()), Arc::new(store.clone()))?;

        let admin = UserRepository::create(
            &store,
            CreateUser {
                username: "admin".to_string(),
                password_hash: state.hasher.hash(ADMIN_PASSWORD)?,
                roles: vec!["Admin".to_string()],
            },
        )
        .await?;

        let jwt_token = token_for(&admin)?;
        let app = build_router(state.clone());

        Ok(Self {
            store,
            state,
            app,
            admin,
            jwt_token,
        })
    }

    /// Sends a request with the admin bearer token
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_with_token(method, uri, body, Some(&self.jwt_token)).await
    }

    /// Sends a request with an optional bearer token
    pub async fn send_with_token(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        self.call(json_request(method, uri, body, token)).await
    }

    /// Sends a prepared request and decodes the JSON body (`Null` if empty)
    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        send_request(&self.app, request).await
    }
}

/// Builds a request with an optional JSON body and bearer token
pub fn json_request(
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Runs `request` through `app` and decodes the JSON body (`Null` if empty)
pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Issues an access token for `user`
pub fn token_for(user: &User) -> anyhow::Result<String> {
    let claims = Claims::new(
        user.id,
        &user.username,
        user.roles.clone(),
        chrono::Duration::minutes(15),
    );
    Ok(create_token(&claims, TEST_JWT_SECRET)?)
}
