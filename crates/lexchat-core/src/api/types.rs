//! Wire types for the chat backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Citation, Message, SessionId, SessionSummary, SessionType};

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub session_type: SessionType,
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub content: &'a str,
}

/// Query parameters for listing sessions.
#[derive(Debug, Clone, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_type: Option<SessionType>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            session_type: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionList {
    pub sessions: Vec<SessionSummary>,
    #[serde(default)]
    pub total: Option<u32>,
}

/// `GET sessions/{id}` response.
///
/// The backend nests the summary under `session`; a flat `{ id, messages }`
/// shape is accepted too.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionDetail {
    #[serde(default)]
    pub session: Option<SessionSummary>,
    #[serde(default)]
    pub id: Option<SessionId>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl SessionDetail {
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session.as_ref().map(|s| &s.id).or(self.id.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageResponse {
    pub assistant_message: Message,
    #[serde(default)]
    pub sources: Option<Vec<Citation>>,
}

impl SendMessageResponse {
    /// Assistant reply with top-level sources folded in when the message has none.
    pub fn into_reply(self) -> Message {
        let mut reply = self.assistant_message;
        if reply.sources.as_ref().is_none_or(Vec::is_empty)
            && let Some(sources) = self.sources
            && !sources.is_empty()
        {
            reply.sources = Some(sources);
        }
        reply
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuickQueryResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Citation>,
    #[serde(default)]
    pub tokens_used: Option<u64>,
    #[serde(default)]
    pub model_used: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatStats {
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub total_messages: u64,
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(default)]
    pub by_type: BTreeMap<String, u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsResponse {
    pub stats: ChatStats,
}

/// FastAPI error body: `{"detail": "..."}` or a validation error list.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    #[test]
    fn test_detail_accepts_nested_and_flat_shapes() {
        let nested = r#"{
            "success": true,
            "session": {"id": "s1", "session_type": "document", "created_at": "2024-05-01T10:00:00Z"},
            "messages": [{"id": "m1", "role": "user", "content": "hi", "created_at": "2024-05-01T10:00:00Z"}]
        }"#;
        let detail: SessionDetail = serde_json::from_str(nested).unwrap();
        assert_eq!(detail.session_id().map(SessionId::as_str), Some("s1"));
        assert_eq!(detail.messages.len(), 1);

        let flat = r#"{"id": "s2", "messages": []}"#;
        let detail: SessionDetail = serde_json::from_str(flat).unwrap();
        assert_eq!(detail.session_id().map(SessionId::as_str), Some("s2"));
    }

    #[test]
    fn test_reply_folds_top_level_sources() {
        let json = r#"{
            "assistant_message": {"role": "assistant", "content": "A contract is...", "sources": null},
            "sources": [{"title": "Contract Act", "similarity": 91.2}]
        }"#;
        let response: SendMessageResponse = serde_json::from_str(json).unwrap();
        let reply = response.into_reply();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.citations().len(), 1);
        assert_eq!(reply.citations()[0].label(), "Contract Act");
    }

    #[test]
    fn test_error_body_joins_validation_messages() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"detail": [{"msg": "field required"}, {"msg": "too long"}]}"#,
        )
        .unwrap();
        assert_eq!(body.message(), "field required; too long");

        let body: ErrorBody = serde_json::from_str(r#"{"detail": "Chat session not found"}"#).unwrap();
        assert_eq!(body.message(), "Chat session not found");
    }

    #[test]
    fn test_create_request_omits_missing_document() {
        let request = CreateSessionRequest {
            session_type: SessionType::General,
            title: Some("New Conversation".to_string()),
            document_id: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["session_type"], "general");
        assert!(json.get("document_id").is_none());
    }
}
