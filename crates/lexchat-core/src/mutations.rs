//! Cross-slice state mutations.
//!
//! Feature reducers return these mutations to request changes outside their
//! own slice. The main reducer applies them in order, so each slice keeps a
//! single writer.

use crate::common::PendingRequest;
use crate::model::{Message, SessionId};
use crate::state::Notice;

#[derive(Debug)]
pub enum StateMutation {
    Session(SessionMutation),
    Registry(RegistryMutation),
    Notify(Notice),
}

/// Active-session changes requested by the registry or the seeder.
#[derive(Debug)]
pub enum SessionMutation {
    /// The session was deleted on the backend; drop it if it is active.
    ResetIfActive(SessionId),
    /// Abandon the current conversation and wait on a seed create.
    BeginSeed(PendingRequest),
    /// The seeded session exists; wait on the prompt post.
    AttachSeed {
        id: SessionId,
        token: PendingRequest,
    },
    /// Seeding finished; show the local acknowledgment.
    CompleteSeed(Message),
    /// Seeding failed; back to an empty draft carrying the error.
    AbandonSeed { error: String },
}

/// Registry operations requested by other slices.
#[derive(Debug)]
pub enum RegistryMutation {
    Refresh,
    /// Delete a session the user never saw; no notices either way.
    DiscardOrphan(SessionId),
}

impl StateMutation {
    pub fn info(text: impl Into<String>) -> Self {
        StateMutation::Notify(Notice::info(text))
    }

    pub fn error(text: impl Into<String>) -> Self {
        StateMutation::Notify(Notice::error(text))
    }
}
