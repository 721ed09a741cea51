//! Events consumed by the reducer.
//!
//! Two sources feed the reducer:
//! - intents from the presentation layer (send, switch, delete, seed)
//! - completions sent by runtime handlers when a backend call finishes

use crate::common::{PendingRequest, TaskId};
use crate::effects::CreateOrigin;
use crate::model::{Message, SessionId, SessionSummary, SessionType};
use crate::seed::DocumentContext;

#[derive(Debug)]
pub enum ChatEvent {
    /// Send a user message in the active conversation (creating it if draft).
    SendMessage { text: String },
    /// Resend the text of the last rolled-back send.
    Retry,
    /// Switch the active conversation to `id`.
    LoadSession { id: SessionId },
    /// Reset to an empty draft.
    NewChat,
    /// Refresh the registry list from the backend.
    RefreshSessions,
    /// Create a session explicitly (without sending a message).
    CreateSession {
        title: Option<String>,
        session_type: SessionType,
        document_id: Option<String>,
    },
    DeleteSession { id: SessionId },
    RenameSession { id: SessionId, title: String },
    /// Deliver a one-shot document handoff into the seeder.
    OfferDocument(DocumentContext),
    /// Consume the pending handoff (no-op when none is pending).
    SeedFromHandoff,

    Registry(RegistryEvent),
    Session(SessionEvent),
}

/// Completions for registry-owned calls.
#[derive(Debug)]
pub enum RegistryEvent {
    Listed {
        task: TaskId,
        result: Result<Vec<SessionSummary>, String>,
    },
    Created {
        task: TaskId,
        result: Result<SessionSummary, String>,
    },
    Deleted {
        task: TaskId,
        id: SessionId,
        result: Result<(), String>,
    },
    Renamed {
        task: TaskId,
        id: SessionId,
        result: Result<SessionSummary, String>,
    },
}

/// Completions for calls scoped to the active conversation.
///
/// Each carries the token captured at issue time; seeding requests are told
/// apart by `token.kind`.
#[derive(Debug)]
pub enum SessionEvent {
    Created {
        token: PendingRequest,
        result: Result<SessionSummary, String>,
    },
    Loaded {
        token: PendingRequest,
        result: Result<Vec<Message>, String>,
    },
    Replied {
        token: PendingRequest,
        result: Result<Message, String>,
    },
}

impl SessionEvent {
    pub fn token(&self) -> &PendingRequest {
        match self {
            SessionEvent::Created { token, .. }
            | SessionEvent::Loaded { token, .. }
            | SessionEvent::Replied { token, .. } => token,
        }
    }
}

impl ChatEvent {
    /// Maps a create completion back to whoever asked for it.
    pub fn session_created(origin: CreateOrigin, result: Result<SessionSummary, String>) -> Self {
        match origin {
            CreateOrigin::Registry(task) => {
                ChatEvent::Registry(RegistryEvent::Created { task, result })
            }
            CreateOrigin::Conversation(token) => {
                ChatEvent::Session(SessionEvent::Created { token, result })
            }
        }
    }
}
