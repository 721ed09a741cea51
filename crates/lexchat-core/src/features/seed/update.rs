//! Seeder reducer.
//!
//! A seed is create (document session) then one prompt post, then a local
//! acknowledgment. The handoff is taken before the create is issued, so a
//! repeated trigger finds the slot empty.

use tracing::{debug, info, warn};

use super::state::{DocumentContext, SeedJob, SeedState};
use crate::api::CreateSessionRequest;
use crate::common::{PendingRequest, RequestKind, TaskSeq};
use crate::effects::{ChatEffect, CreateOrigin};
use crate::model::{Message, SessionSummary, SessionType};
use crate::mutations::{RegistryMutation, SessionMutation, StateMutation};
use crate::prompts::build_seed_prompt;
use crate::session::SessionState;

type Outcome = (Vec<ChatEffect>, Vec<StateMutation>);

pub fn offer(seed: &mut SeedState, context: DocumentContext) -> Outcome {
    if seed.handoff.offer(context) {
        debug!("document handoff stored");
    } else {
        debug!("document handoff already consumed; ignored");
    }
    (vec![], vec![])
}

/// Consumes the pending handoff, if any, and starts seeding.
pub fn seed_from_handoff(seed: &mut SeedState, seq: &mut TaskSeq) -> Outcome {
    if seed.job.is_some() {
        debug!("seed already in flight; handoff left in place");
        return (vec![], vec![]);
    }
    let Some(context) = seed.handoff.take() else {
        return (vec![], vec![]);
    };
    if context.text.trim().is_empty() {
        warn!("document handoff had no text");
        return (
            vec![],
            vec![StateMutation::error("The shared document contains no text")],
        );
    }

    let token = PendingRequest::new(seq.next_id(), RequestKind::SeedCreate, None);
    let title = context
        .document_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| seed.config.document_title.clone());
    info!(task = ?token.task, %title, "seeding document session");

    let effect = ChatEffect::CreateSession {
        origin: CreateOrigin::Conversation(token.clone()),
        request: CreateSessionRequest {
            session_type: SessionType::Document,
            title: Some(title),
            document_id: context.document_id.clone(),
        },
    };
    seed.job = Some(SeedJob {
        token: token.clone(),
        context,
    });
    (
        vec![effect],
        vec![StateMutation::Session(SessionMutation::BeginSeed(token))],
    )
}

pub fn handle_created(
    seed: &mut SeedState,
    session: &SessionState,
    seq: &mut TaskSeq,
    token: &PendingRequest,
    result: Result<SessionSummary, String>,
) -> Outcome {
    if !seed.owns(token) {
        debug!(task = ?token.task, "discarding stale seed create");
        return (vec![], vec![]);
    }
    if !session.accepts(token) {
        warn!(task = ?token.task, "conversation changed during seed; abandoned");
        seed.job = None;
        return (vec![], vec![]);
    }
    let Some(job) = seed.job.take() else {
        return (vec![], vec![]);
    };

    match result {
        Ok(summary) => {
            let id = summary.id;
            let prompt_token =
                PendingRequest::new(seq.next_id(), RequestKind::SeedPrompt, Some(id.clone()));
            info!(session = %id, task = ?prompt_token.task, "seed session created; posting document");
            let effect = ChatEffect::PostMessage {
                token: prompt_token.clone(),
                id: id.clone(),
                content: build_seed_prompt(&job.context.text),
            };
            seed.job = Some(SeedJob {
                token: prompt_token.clone(),
                context: job.context,
            });
            (
                vec![effect],
                vec![StateMutation::Session(SessionMutation::AttachSeed {
                    id,
                    token: prompt_token,
                })],
            )
        }
        Err(error) => {
            warn!(%error, "seed create failed");
            abandon(error, "Could not start document conversation")
        }
    }
}

pub fn handle_replied(
    seed: &mut SeedState,
    session: &SessionState,
    token: &PendingRequest,
    result: Result<Message, String>,
) -> Outcome {
    if !seed.owns(token) {
        debug!(task = ?token.task, "discarding stale seed reply");
        return (vec![], vec![]);
    }
    seed.job = None;
    if !session.accepts(token) {
        warn!(task = ?token.task, "conversation changed during seed; abandoned");
        return (vec![], vec![]);
    }

    match result {
        // The backend's own reply is not shown; the acknowledgment is local.
        Ok(_) => {
            info!(session = ?token.session_id, "document session seeded");
            (
                vec![],
                vec![
                    StateMutation::Session(SessionMutation::CompleteSeed(Message::assistant(
                        seed.config.acknowledgment.clone(),
                    ))),
                    StateMutation::Registry(RegistryMutation::Refresh),
                ],
            )
        }
        Err(error) => {
            warn!(%error, session = ?token.session_id, "seed prompt failed");
            let (effects, mut mutations) = abandon(error, "Could not send document to assistant");
            if let Some(orphan) = token.session_id.clone() {
                mutations.push(StateMutation::Registry(RegistryMutation::DiscardOrphan(orphan)));
            }
            (effects, mutations)
        }
    }
}

fn abandon(error: String, context: &str) -> Outcome {
    let notice = format!("{context}: {error}");
    (
        vec![],
        vec![
            StateMutation::Session(SessionMutation::AbandonSeed { error }),
            StateMutation::error(notice),
        ],
    )
}
