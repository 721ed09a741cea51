//! Backend fixtures for integration tests.

#![allow(dead_code)]

use lexchat_core::api::BackendClient;
use lexchat_core::config::Config;
use lexchat_core::runtime::ChatRuntime;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Version prefix the client is pointed at.
pub const API_PREFIX: &str = "/api/v1";

/// Returns true if binding a local TCP listener is permitted.
pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

pub fn api_path(tail: &str) -> String {
    format!("{API_PREFIX}/{tail}")
}

pub fn client_for(server: &MockServer) -> BackendClient {
    BackendClient::new(&format!("{}{API_PREFIX}", server.uri()), None).unwrap()
}

pub fn runtime_for(server: &MockServer) -> ChatRuntime {
    ChatRuntime::with_client(Config::default(), client_for(server))
}

pub fn session_json(id: &str, title: &str, session_type: &str) -> Value {
    json!({
        "id": id,
        "user_id": "u1",
        "document_id": null,
        "title": title,
        "session_type": session_type,
        "message_count": 0,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z"
    })
}

pub fn message_json(role: &str, content: &str) -> Value {
    json!({
        "id": format!("m-{}", content.len()),
        "session_id": "ignored",
        "role": role,
        "content": content,
        "sources": null,
        "tokens_used": 12,
        "created_at": "2024-05-01T10:00:00Z"
    })
}

/// `POST sessions/{id}/messages` response body.
pub fn reply_json(content: &str) -> Value {
    json!({
        "user_message": message_json("user", "echo"),
        "assistant_message": message_json("assistant", content),
        "sources": []
    })
}

pub fn list_json(sessions: Vec<Value>) -> Value {
    let total = sessions.len();
    json!({ "sessions": sessions, "total": total, "page": 1, "page_size": 20 })
}

pub fn detail_json(session: Value, messages: Vec<Value>) -> Value {
    json!({ "session": session, "messages": messages })
}
