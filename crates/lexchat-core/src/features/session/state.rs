//! Active session state.
//!
//! Exactly one conversation is open at a time. It is either a draft (no
//! backend id yet) or tied to one backend session id; the summary itself is
//! owned by the registry and looked up by id.

use tracing::debug;

use crate::common::PendingRequest;
use crate::model::{Message, SessionId};
use crate::mutations::SessionMutation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No backend session yet.
    Draft,
    /// Exactly one send, create or history load is in flight.
    Pending,
    /// History up to date, nothing in flight.
    Idle,
    /// Last operation failed; messages match the last known-good state.
    Error,
}

/// Bookkeeping for the send currently in flight.
#[derive(Debug, Clone)]
pub(super) struct PendingSend {
    /// Original input, kept for retry after rollback.
    pub text: String,
    /// Message count before the optimistic append.
    pub rollback_len: usize,
}

/// Last known-good state, restored if a history load fails.
#[derive(Debug, Clone)]
pub(super) struct Restore {
    pub session_id: Option<SessionId>,
    pub messages: Vec<Message>,
}

#[derive(Debug)]
pub struct SessionState {
    pub(super) session_id: Option<SessionId>,
    pub(super) messages: Vec<Message>,
    pub(super) phase: Phase,
    pub(super) in_flight: Option<PendingRequest>,
    pub(super) pending_send: Option<PendingSend>,
    pub(super) restore: Option<Restore>,
    /// Text of the last rolled-back send.
    pub(super) retry_input: Option<String>,
    pub(super) last_error: Option<String>,
    /// Created by this controller and not yet shown in the registry.
    pub(super) unannounced: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self {
            session_id: None,
            messages: Vec::new(),
            phase: Phase::Draft,
            in_flight: None,
            pending_send: None,
            restore: None,
            retry_input: None,
            last_error: None,
            unannounced: false,
        }
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn in_flight(&self) -> Option<&PendingRequest> {
        self.in_flight.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn retry_input(&self) -> Option<&str> {
        self.retry_input.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True when `token` belongs to the request in flight for the active conversation.
    pub fn accepts(&self, token: &PendingRequest) -> bool {
        token.matches(self.in_flight.as_ref(), self.session_id.as_ref())
    }

    pub(super) fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, session = ?self.session_id, "phase change");
        }
        self.phase = phase;
    }

    /// Phase to fall back to when nothing is in flight.
    pub(super) fn resting_phase(&self) -> Phase {
        if self.session_id.is_some() {
            Phase::Idle
        } else {
            Phase::Draft
        }
    }

    /// Empty draft; any in-flight response will fail the token check.
    pub(super) fn reset(&mut self) {
        self.session_id = None;
        self.messages.clear();
        self.in_flight = None;
        self.pending_send = None;
        self.restore = None;
        self.retry_input = None;
        self.last_error = None;
        self.unannounced = false;
        self.set_phase(Phase::Draft);
    }

    /// Current messages minus any optimistic message whose send is still open.
    pub(super) fn known_good_messages(&self) -> Vec<Message> {
        let mut messages = self.messages.clone();
        if let Some(send) = &self.pending_send {
            messages.truncate(send.rollback_len);
        }
        messages
    }

    /// Applies a cross-slice session mutation.
    pub fn apply(&mut self, mutation: SessionMutation) {
        match mutation {
            SessionMutation::ResetIfActive(id) => {
                if self.session_id.as_ref() == Some(&id) {
                    debug!(session = %id, "active session deleted; resetting to draft");
                    self.reset();
                } else if self
                    .restore
                    .as_ref()
                    .is_some_and(|r| r.session_id.as_ref() == Some(&id))
                {
                    // A failed load must not fall back to a deleted session.
                    self.restore = Some(Restore {
                        session_id: None,
                        messages: Vec::new(),
                    });
                }
            }
            SessionMutation::BeginSeed(token) => {
                self.reset();
                self.in_flight = Some(token);
                self.set_phase(Phase::Pending);
            }
            SessionMutation::AttachSeed { id, token } => {
                self.session_id = Some(id);
                self.in_flight = Some(token);
            }
            SessionMutation::CompleteSeed(acknowledgment) => {
                self.in_flight = None;
                self.messages.push(acknowledgment);
                self.set_phase(Phase::Idle);
            }
            SessionMutation::AbandonSeed { error } => {
                self.reset();
                self.last_error = Some(error);
            }
        }
    }
}
