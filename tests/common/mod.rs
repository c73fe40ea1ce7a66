//! Test helpers for Web API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use message_board::board::ListingLimits;
use message_board::web::{create_health_router, create_router, AppState};
use message_board::Database;

/// Create a test server with an in-memory database and default limits.
pub async fn create_test_server() -> TestServer {
    create_test_server_with_limits(ListingLimits::default()).await
}

/// Create a test server with custom listing limits.
pub async fn create_test_server_with_limits(limits: ListingLimits) -> TestServer {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let app_state = Arc::new(AppState::new(db).with_limits(limits));

    let router = create_router(app_state, &[]).merge(create_health_router());

    TestServer::new(router).expect("Failed to create test server")
}

/// Post a thread and return the created thread.
pub async fn create_thread(server: &TestServer, board: &str, text: &str, password: &str) -> Value {
    server
        .post(&format!("/api/threads/{board}"))
        .json(&json!({ "text": text, "password": password }))
        .await
        .json::<Value>()
}

/// Post a reply and return the bumped thread.
pub async fn create_reply(
    server: &TestServer,
    board: &str,
    thread_id: &str,
    text: &str,
    password: &str,
) -> Value {
    server
        .post(&format!("/api/replies/{board}"))
        .json(&json!({ "threadId": thread_id, "text": text, "password": password }))
        .await
        .json::<Value>()
}

/// The `_id` of a thread or reply as a string.
pub fn id_of(document: &Value) -> String {
    document["_id"]
        .as_str()
        .expect("document has no _id")
        .to_string()
}
