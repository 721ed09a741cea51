//! Effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! Each one is exactly one backend call; the reducer never performs I/O.
//!
//! There is no network cancellation. A call whose result is no longer
//! wanted still runs to completion and its event is discarded by the
//! reducer's token check.

use crate::api::{CreateSessionRequest, ListQuery};
use crate::common::{PendingRequest, TaskId};
use crate::model::SessionId;

/// Who a create call reports back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOrigin {
    /// Explicit registry create.
    Registry(TaskId),
    /// Implicit create for the active conversation (first send or seeding).
    Conversation(PendingRequest),
}

#[derive(Debug)]
pub enum ChatEffect {
    /// `GET chat/sessions`.
    ListSessions { task: TaskId, query: ListQuery },

    /// `POST chat/sessions`.
    CreateSession {
        origin: CreateOrigin,
        request: CreateSessionRequest,
    },

    /// `GET chat/sessions/{id}`.
    LoadHistory { token: PendingRequest, id: SessionId },

    /// `POST chat/sessions/{id}/messages`.
    PostMessage {
        token: PendingRequest,
        id: SessionId,
        content: String,
    },

    /// `DELETE chat/sessions/{id}`.
    DeleteSession { task: TaskId, id: SessionId },

    /// `PUT chat/sessions/{id}?title=`.
    RenameSession {
        task: TaskId,
        id: SessionId,
        title: String,
    },
}
