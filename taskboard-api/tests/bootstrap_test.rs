/// Integration tests for first-run setup on an empty store

mod common;

use axum::http::{Method, StatusCode};
use common::{json_request, send_request, test_config};
use serde_json::json;
use std::sync::Arc;
use taskboard_api::{
    app::{build_router, AppState},
    bootstrap::ensure_initial_admin,
    config::InitialAdminConfig,
};
use taskboard_shared::models::user::CreateUser;
use taskboard_shared::repository::{InMemoryStore, UserRepository};

fn empty_state() -> (InMemoryStore, AppState) {
    let store = InMemoryStore::new();
    let state = AppState::new(test_config(), Arc::new(store.clone()), Arc::new(store.clone()))
        .unwrap();
    (store, state)
}

fn root_admin() -> InitialAdminConfig {
    InitialAdminConfig {
        username: "root".to_string(),
        password: "root-password".to_string(),
    }
}

#[tokio::test]
async fn test_empty_store_reachable_after_initial_admin() {
    let (store, state) = empty_state();
    let app = build_router(state.clone());

    let (status, _) = send_request(
        &app,
        json_request(
            Method::POST,
            "/users",
            Some(json!({ "username": "first", "password": "pw", "roles": ["Employee"] })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(store.list().await.unwrap().is_empty());

    let admin = ensure_initial_admin(&state, &root_admin())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(admin.roles, vec!["Admin"]);
    assert!(admin.active);

    let (status, body) = send_request(
        &app,
        json_request(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "root", "password": "root-password" })),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["accessToken"].as_str().unwrap().to_string();

    let (status, body) = send_request(
        &app,
        json_request(
            Method::POST,
            "/users",
            Some(json!({ "username": "first", "password": "pw", "roles": ["Employee"] })),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "New user first created");
    assert_eq!(store.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_initial_admin_skipped_when_users_exist() {
    let (store, state) = empty_state();
    UserRepository::create(
        &store,
        CreateUser {
            username: "existing".to_string(),
            password_hash: state.hasher.hash("pw").unwrap(),
            roles: vec!["Manager".to_string()],
        },
    )
    .await
    .unwrap();

    let created = ensure_initial_admin(&state, &root_admin()).await.unwrap();
    assert!(created.is_none());
    assert!(store.find_by_username("root").await.unwrap().is_none());
}

#[tokio::test]
async fn test_initial_admin_runs_once() {
    let (store, state) = empty_state();

    assert!(ensure_initial_admin(&state, &root_admin()).await.unwrap().is_some());
    assert!(ensure_initial_admin(&state, &root_admin()).await.unwrap().is_none());
    assert_eq!(store.list().await.unwrap().len(), 1);
}
