//! Test utilities for integration testing
use crate::{
    AppState, Application,
    auth::access::AccessController,
    config::{Config, DatabaseConfig},
    db::handlers::{InMemoryAccountStore, InMemoryDatasetStore},
};
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;

/// Config for tests: in-memory storage and no global metrics recorder.
pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig::Memory,
        enable_metrics: false,
        ..Default::default()
    }
}

/// Fresh in-memory state. Use this when a test needs to reach into the stores directly.
pub fn create_test_app_state() -> AppState {
    AppState::builder()
        .config(create_test_config())
        .access(AccessController::new(Arc::new(InMemoryAccountStore::new())))
        .dataset(Arc::new(InMemoryDatasetStore::new()))
        .build()
}

pub fn create_test_server(state: AppState) -> TestServer {
    Application::from_state(state, None).into_test_server()
}

pub fn create_test_app() -> TestServer {
    create_test_server(create_test_app_state())
}

pub fn auth_header(api_key: &str) -> String {
    format!("Bearer {api_key}")
}

/// Sign up through the API and return the issued key.
pub async fn signup_key(server: &TestServer, email: &str, plan: &str) -> String {
    let response = server.post("/signup").json(&json!({"email": email, "plan": plan})).await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["api_key"].as_str().expect("signup response should carry an api_key").to_string()
}

/// Add a sentence with default metadata and return its id.
pub async fn add_sentence(server: &TestServer, text: &str) -> i64 {
    let response = server.post("/sentences").json(&json!({"text": text})).await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["id"].as_i64().expect("create response should carry an id")
}
