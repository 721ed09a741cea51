//! Integration tests for backend-facing commands against a mock backend.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a temp LEXCHAT_HOME directory for test isolation.
fn temp_lexchat_home() -> TempDir {
    TempDir::new().expect("create temp lexchat home")
}

/// Returns true if binding a local TCP listener is permitted.
fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn session_json(id: &str, title: &str, session_type: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "session_type": session_type,
        "message_count": 2,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:05:00Z"
    })
}

fn message_json(role: &str, content: &str) -> Value {
    json!({ "role": role, "content": content })
}

fn lexchat(home: &TempDir, server: &MockServer) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("lexchat");
    cmd.env("LEXCHAT_HOME", home.path())
        .env("LEXCHAT_BASE_URL", format!("{}/api/v1", server.uri()))
        .env_remove("LEXCHAT_API_TOKEN")
        .env_remove("LEXCHAT_LOG");
    cmd
}

#[tokio::test]
async fn test_sessions_list_prints_titles() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_lexchat_home();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/chat/sessions"))
        .and(query_param("session_type", "document"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessions": [
                session_json("a1b2c3d4e5f6", "Lease questions", "document"),
                session_json("f6e5d4c3b2a1", "NDA review", "document")
            ],
            "total": 2, "page": 1, "page_size": 20
        })))
        .expect(1)
        .mount(&server)
        .await;

    lexchat(&home, &server)
        .args(["sessions", "list", "--type", "document"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lease questions"))
        .stdout(predicate::str::contains("a1b2c3d4e5f6"))
        .stdout(predicate::str::contains("NDA review"));
}

#[tokio::test]
async fn test_sessions_show_prints_transcript() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_lexchat_home();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/chat/sessions/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session": session_json("s1", "Contracts", "general"),
            "messages": [
                message_json("user", "What is a contract?"),
                message_json("assistant", "A legally binding agreement.")
            ]
        })))
        .mount(&server)
        .await;

    lexchat(&home, &server)
        .args(["sessions", "show", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("you: What is a contract?"))
        .stdout(predicate::str::contains(
            "assistant: A legally binding agreement.",
        ));
}

#[tokio::test]
async fn test_sessions_delete_missing_reports_detail() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_lexchat_home();
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/chat/sessions/nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Chat session not found" })),
        )
        .mount(&server)
        .await;

    lexchat(&home, &server)
        .args(["sessions", "delete", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("delete session 'nope'"))
        .stderr(predicate::str::contains("Chat session not found"));
}

#[tokio::test]
async fn test_base_url_flag_overrides_env() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_lexchat_home();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/chat/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stats": {
                "total_sessions": 4,
                "total_messages": 18,
                "total_tokens": 5120,
                "by_type": { "general": 3, "document": 1 }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("lexchat")
        .env("LEXCHAT_HOME", home.path())
        .env("LEXCHAT_BASE_URL", "http://127.0.0.1:9/unused")
        .args(["--base-url", &format!("{}/api/v1", server.uri()), "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions: 4"))
        .stdout(predicate::str::contains("document: 1"));
}

#[tokio::test]
async fn test_ask_prints_answer_and_sources() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_lexchat_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/query"))
        .and(query_param("query", "What is consideration?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Something of value exchanged between parties.",
            "sources": [{ "title": "Indian Contract Act", "page": 2 }],
            "tokens_used": 80,
            "model_used": "test-model"
        })))
        .mount(&server)
        .await;

    lexchat(&home, &server)
        .args(["ask", "What", "is", "consideration?"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Something of value exchanged between parties.",
        ))
        .stdout(predicate::str::contains("Indian Contract Act (p. 2)"));
}

#[tokio::test]
async fn test_chat_sends_piped_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_lexchat_home();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/chat/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessions": [], "total": 0, "page": 1, "page_size": 20
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/sessions"))
        .and(body_partial_json(json!({ "session_type": "general" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(session_json("s1", "New Conversation", "general")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/sessions/s1/messages"))
        .and(body_partial_json(json!({ "content": "What is a contract?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "assistant_message": message_json("assistant", "A legally binding agreement.")
        })))
        .expect(1)
        .mount(&server)
        .await;

    lexchat(&home, &server)
        .arg("chat")
        .write_stdin("What is a contract?\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("you: What is a contract?"))
        .stdout(predicate::str::contains(
            "assistant: A legally binding agreement.",
        ));
}

#[tokio::test]
async fn test_chat_seeds_document_once() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_lexchat_home();
    let doc_path = home.path().join("lease.txt");
    fs::write(&doc_path, "This Agreement is made between the Landlord and the Tenant.").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/chat/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessions": [session_json("s3", "lease.txt", "document")],
            "total": 1, "page": 1, "page_size": 20
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/sessions"))
        .and(body_partial_json(json!({
            "session_type": "document",
            "title": "lease.txt",
            "document_id": "d-9"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(session_json("s3", "lease.txt", "document")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/sessions/s3/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "assistant_message": message_json("assistant", "Backend acknowledgment (not shown).")
        })))
        .expect(1)
        .mount(&server)
        .await;

    lexchat(&home, &server)
        .args([
            "chat",
            "--document",
            doc_path.to_str().unwrap(),
            "--document-id",
            "d-9",
        ])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("I've reviewed the document you shared."))
        .stdout(predicate::str::contains("Backend acknowledgment").not());
}

#[tokio::test]
async fn test_chat_session_listing_waits_for_refresh() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_lexchat_home();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/chat/sessions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "sessions": [session_json("s1", "Lease questions", "general")],
                    "total": 1, "page": 1, "page_size": 20
                }))
                .set_delay(std::time::Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    lexchat(&home, &server)
        .arg("chat")
        .write_stdin("/sessions\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Lease questions"))
        .stdout(predicate::str::contains("No sessions yet.").not());
}
