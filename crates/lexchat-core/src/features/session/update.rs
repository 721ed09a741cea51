//! Active session reducer.
//!
//! Handles the send lifecycle (optimistic append, reconcile, rollback),
//! session switching and draft resets. Every completion is gated by the
//! token captured when its call was issued; a mismatch is a silent discard.

use tracing::{debug, info, warn};

use super::state::{PendingSend, Phase, Restore, SessionState};
use crate::api::{CreateSessionRequest, validate_content};
use crate::common::{PendingRequest, RequestKind, TaskSeq};
use crate::effects::{ChatEffect, CreateOrigin};
use crate::model::{Message, SessionId, SessionSummary, SessionType};
use crate::mutations::{RegistryMutation, StateMutation};

type Outcome = (Vec<ChatEffect>, Vec<StateMutation>);

/// Starts a send. Creates the session first when the conversation is a draft.
///
/// Rejected without side effects when the text is blank or a request is
/// already in flight.
pub fn send_message(
    session: &mut SessionState,
    seq: &mut TaskSeq,
    text: String,
    default_title: &str,
) -> Outcome {
    if text.trim().is_empty() {
        debug!("ignoring blank send");
        return (vec![], vec![]);
    }
    if session.is_pending() {
        debug!(in_flight = ?session.in_flight, "send rejected: request already in flight");
        return (vec![], vec![]);
    }
    if let Err(e) = validate_content(&text) {
        return (vec![], vec![StateMutation::error(format!("Not sent: {e}"))]);
    }

    session.last_error = None;
    session.retry_input = None;

    let Some(id) = session.session_id.clone() else {
        let token = PendingRequest::new(seq.next_id(), RequestKind::Create, None);
        info!(task = ?token.task, "creating session for first message");
        session.pending_send = Some(PendingSend {
            text,
            rollback_len: session.messages.len(),
        });
        session.in_flight = Some(token.clone());
        session.set_phase(Phase::Pending);
        let effect = ChatEffect::CreateSession {
            origin: CreateOrigin::Conversation(token),
            request: CreateSessionRequest {
                session_type: SessionType::General,
                title: Some(default_title.to_string()),
                document_id: None,
            },
        };
        return (vec![effect], vec![]);
    };

    (vec![begin_post(session, seq, id, text)], vec![])
}

/// Resends the text of the last rolled-back send.
pub fn retry(session: &mut SessionState, seq: &mut TaskSeq, default_title: &str) -> Outcome {
    match session.retry_input.clone() {
        Some(text) if !session.is_pending() => send_message(session, seq, text, default_title),
        _ => (vec![], vec![]),
    }
}

/// Appends the optimistic user message and issues the post.
fn begin_post(session: &mut SessionState, seq: &mut TaskSeq, id: SessionId, text: String) -> ChatEffect {
    let token = PendingRequest::new(seq.next_id(), RequestKind::Send, Some(id.clone()));
    debug!(task = ?token.task, session = %id, "posting message");
    session.pending_send = Some(PendingSend {
        text: text.clone(),
        rollback_len: session.messages.len(),
    });
    session.messages.push(Message::user(text.clone()));
    session.in_flight = Some(token.clone());
    session.set_phase(Phase::Pending);
    ChatEffect::PostMessage {
        token,
        id,
        content: text,
    }
}

/// Implicit create finished.
pub fn handle_created(
    session: &mut SessionState,
    seq: &mut TaskSeq,
    token: &PendingRequest,
    result: Result<SessionSummary, String>,
) -> Outcome {
    if !session.accepts(token) {
        warn!(task = ?token.task, "discarding stale create response");
        return (vec![], vec![]);
    }
    let Some(send) = session.pending_send.take() else {
        warn!(task = ?token.task, "create completed without a pending send");
        session.in_flight = None;
        session.set_phase(session.resting_phase());
        return (vec![], vec![]);
    };

    match result {
        Ok(summary) => {
            info!(session = %summary.id, "session created");
            session.session_id = Some(summary.id.clone());
            session.unannounced = true;
            (vec![begin_post(session, seq, summary.id, send.text)], vec![])
        }
        Err(error) => {
            warn!(%error, "session create failed");
            session.in_flight = None;
            session.retry_input = Some(send.text);
            session.last_error = Some(error.clone());
            session.set_phase(Phase::Draft);
            (
                vec![],
                vec![StateMutation::error(format!(
                    "Could not start conversation: {error}"
                ))],
            )
        }
    }
}

/// Message post finished: reconcile or roll back.
pub fn handle_replied(
    session: &mut SessionState,
    token: &PendingRequest,
    result: Result<Message, String>,
) -> Outcome {
    if !session.accepts(token) {
        warn!(task = ?token.task, session = ?token.session_id, "discarding stale reply");
        return (vec![], vec![]);
    }
    session.in_flight = None;
    let send = session.pending_send.take();

    match result {
        Ok(reply) => {
            session.messages.push(reply);
            session.set_phase(Phase::Idle);
            let mut mutations = Vec::new();
            if session.unannounced {
                session.unannounced = false;
                mutations.push(StateMutation::Registry(RegistryMutation::Refresh));
            }
            (vec![], mutations)
        }
        Err(error) => {
            warn!(%error, session = ?session.session_id, "send failed; rolling back");
            if let Some(send) = send {
                session.messages.truncate(send.rollback_len);
                session.retry_input = Some(send.text);
            }
            session.last_error = Some(error.clone());
            session.set_phase(Phase::Error);
            (
                vec![],
                vec![StateMutation::error(format!("Message not sent: {error}"))],
            )
        }
    }
}

/// Switches to `id`, fetching its full history.
pub fn load_session(session: &mut SessionState, seq: &mut TaskSeq, id: SessionId) -> Outcome {
    if let Some(current) = &session.in_flight
        && current.kind == RequestKind::Load
        && current.session_id.as_ref() == Some(&id)
    {
        debug!(session = %id, "load already in flight");
        return (vec![], vec![]);
    }

    // Keep the oldest snapshot when one load supersedes another.
    if session.restore.is_none() {
        session.restore = Some(Restore {
            session_id: session.session_id.clone(),
            messages: session.known_good_messages(),
        });
    }

    let token = PendingRequest::new(seq.next_id(), RequestKind::Load, Some(id.clone()));
    info!(task = ?token.task, session = %id, "loading session");
    session.session_id = Some(id.clone());
    session.messages.clear();
    session.pending_send = None;
    session.retry_input = None;
    session.last_error = None;
    session.unannounced = false;
    session.in_flight = Some(token.clone());
    session.set_phase(Phase::Pending);

    (vec![ChatEffect::LoadHistory { token, id }], vec![])
}

/// History load finished: replace atomically or restore the previous state.
pub fn handle_loaded(
    session: &mut SessionState,
    token: &PendingRequest,
    result: Result<Vec<Message>, String>,
) -> Outcome {
    if !session.accepts(token) {
        warn!(task = ?token.task, session = ?token.session_id, "discarding stale history");
        return (vec![], vec![]);
    }
    session.in_flight = None;
    let restore = session.restore.take();

    match result {
        Ok(messages) => {
            debug!(count = messages.len(), "history loaded");
            session.messages = messages;
            session.set_phase(Phase::Idle);
            (vec![], vec![])
        }
        Err(error) => {
            warn!(%error, session = ?token.session_id, "history load failed");
            let restore = restore.unwrap_or(Restore {
                session_id: None,
                messages: Vec::new(),
            });
            session.session_id = restore.session_id;
            session.messages = restore.messages;
            session.last_error = Some(error.clone());
            session.set_phase(Phase::Error);
            (
                vec![],
                vec![StateMutation::error(format!(
                    "Could not open conversation: {error}"
                ))],
            )
        }
    }
}

/// Unconditional reset to an empty draft. In-flight calls keep running but
/// their results will be discarded.
pub fn new_chat(session: &mut SessionState) -> Outcome {
    if let Some(token) = &session.in_flight {
        debug!(task = ?token.task, "abandoning in-flight request");
    }
    session.reset();
    (vec![], vec![])
}
