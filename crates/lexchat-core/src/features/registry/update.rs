//! Registry reducer.
//!
//! The cache is only ever replaced wholesale by a list, or edited for the
//! one entry a create, delete or rename call succeeded on.

use tracing::{debug, info, warn};

use super::state::RegistryState;
use crate::api::CreateSessionRequest;
use crate::common::{TaskId, TaskSeq};
use crate::effects::{ChatEffect, CreateOrigin};
use crate::model::{SessionId, SessionSummary, SessionType};
use crate::mutations::{SessionMutation, StateMutation};

type Outcome = (Vec<ChatEffect>, Vec<StateMutation>);

/// Requests a list refresh. Coalesced while one is in flight.
pub fn refresh(registry: &mut RegistryState, seq: &mut TaskSeq) -> Vec<ChatEffect> {
    if registry.list.is_running() {
        debug!("refresh already in flight; queued");
        registry.refresh_queued = true;
        return vec![];
    }
    let task = seq.next_id();
    registry.list.begin(task);
    debug!(?task, query = ?registry.query, "listing sessions");
    vec![ChatEffect::ListSessions {
        task,
        query: registry.query.clone(),
    }]
}

pub fn handle_listed(
    registry: &mut RegistryState,
    seq: &mut TaskSeq,
    task: TaskId,
    result: Result<Vec<SessionSummary>, String>,
) -> Outcome {
    if !registry.list.finish_if_active(task) {
        debug!(?task, "discarding stale list response");
        return (vec![], vec![]);
    }

    let deleted = std::mem::take(&mut registry.deleted_during_list);
    let mut mutations = Vec::new();
    match result {
        Ok(mut sessions) => {
            sessions.retain(|s| !deleted.contains(&s.id));
            debug!(count = sessions.len(), dropped = deleted.len(), "session list replaced");
            registry.sessions = sessions;
            registry.loaded = true;
            registry.last_error = None;
        }
        Err(error) => {
            // Stale-but-available beats empty.
            warn!(%error, "session list failed; keeping cached list");
            registry.last_error = Some(error.clone());
            mutations.push(StateMutation::error(format!(
                "Could not refresh conversations: {error}"
            )));
        }
    }

    let mut effects = Vec::new();
    if std::mem::take(&mut registry.refresh_queued) {
        effects = refresh(registry, seq);
    }
    (effects, mutations)
}

/// Explicit create. One at a time.
pub fn create(
    registry: &mut RegistryState,
    seq: &mut TaskSeq,
    title: Option<String>,
    session_type: SessionType,
    document_id: Option<String>,
) -> Outcome {
    if registry.create.is_running() {
        debug!("create already in flight; ignored");
        return (vec![], vec![]);
    }
    let task = seq.next_id();
    registry.create.begin(task);
    info!(?task, session_type = session_type.as_str(), "creating session");
    let effect = ChatEffect::CreateSession {
        origin: CreateOrigin::Registry(task),
        request: CreateSessionRequest {
            session_type,
            title,
            document_id,
        },
    };
    (vec![effect], vec![])
}

pub fn handle_created(
    registry: &mut RegistryState,
    task: TaskId,
    result: Result<SessionSummary, String>,
) -> Outcome {
    if !registry.create.finish_if_active(task) {
        debug!(?task, "discarding stale create response");
        return (vec![], vec![]);
    }
    match result {
        Ok(summary) => {
            info!(session = %summary.id, "session created");
            let notice = format!("Created {}", summary.display_title());
            registry.remove(&summary.id);
            registry.sessions.insert(0, summary);
            (vec![], vec![StateMutation::info(notice)])
        }
        Err(error) => {
            warn!(%error, "create failed");
            registry.last_error = Some(error.clone());
            (
                vec![],
                vec![StateMutation::error(format!(
                    "Could not create conversation: {error}"
                ))],
            )
        }
    }
}

pub fn delete(registry: &mut RegistryState, seq: &mut TaskSeq, id: SessionId) -> Outcome {
    if registry.deletes.contains_key(&id) {
        debug!(session = %id, "delete already in flight");
        return (vec![], vec![]);
    }
    let task = seq.next_id();
    registry.deletes.insert(id.clone(), task);
    info!(?task, session = %id, "deleting session");
    (vec![ChatEffect::DeleteSession { task, id }], vec![])
}

/// Deletes a session the user never saw (a half-seeded one). Silent either way.
pub fn discard_orphan(registry: &mut RegistryState, seq: &mut TaskSeq, id: SessionId) -> Outcome {
    let (effects, mutations) = delete(registry, seq, id.clone());
    if !effects.is_empty() {
        registry.quiet_deletes.insert(id);
    }
    (effects, mutations)
}

pub fn handle_deleted(
    registry: &mut RegistryState,
    task: TaskId,
    id: SessionId,
    result: Result<(), String>,
) -> Outcome {
    if registry.deletes.get(&id) != Some(&task) {
        debug!(?task, session = %id, "discarding stale delete response");
        return (vec![], vec![]);
    }
    registry.deletes.remove(&id);
    let quiet = registry.quiet_deletes.remove(&id);

    match result {
        Ok(()) => {
            registry.remove(&id);
            if registry.list.is_running() {
                registry.deleted_during_list.insert(id.clone());
            }
            info!(session = %id, quiet, "session deleted");
            // Only now that the backend agreed may the active conversation go.
            let mut mutations = vec![StateMutation::Session(SessionMutation::ResetIfActive(
                id.clone(),
            ))];
            if !quiet {
                mutations.push(StateMutation::info(format!("Deleted {}", id.short())));
            }
            (vec![], mutations)
        }
        Err(error) => {
            warn!(%error, session = %id, quiet, "delete failed; entry kept");
            if quiet {
                return (vec![], vec![]);
            }
            registry.last_error = Some(error.clone());
            (
                vec![],
                vec![StateMutation::error(format!(
                    "Could not delete {}: {error}",
                    id.short()
                ))],
            )
        }
    }
}

pub fn rename(registry: &mut RegistryState, seq: &mut TaskSeq, id: SessionId, title: String) -> Outcome {
    let title = title.trim().to_string();
    if title.is_empty() {
        return (vec![], vec![StateMutation::error("Title cannot be empty")]);
    }
    if registry.renames.contains_key(&id) {
        debug!(session = %id, "rename already in flight");
        return (vec![], vec![]);
    }
    let task = seq.next_id();
    registry.renames.insert(id.clone(), task);
    info!(?task, session = %id, "renaming session");
    (vec![ChatEffect::RenameSession { task, id, title }], vec![])
}

pub fn handle_renamed(
    registry: &mut RegistryState,
    task: TaskId,
    id: SessionId,
    result: Result<SessionSummary, String>,
) -> Outcome {
    if registry.renames.get(&id) != Some(&task) {
        debug!(?task, session = %id, "discarding stale rename response");
        return (vec![], vec![]);
    }
    registry.renames.remove(&id);

    match result {
        Ok(summary) => {
            let notice = format!("Renamed to {}", summary.display_title());
            if !registry.replace(summary) {
                debug!(session = %id, "renamed session not cached");
            }
            (vec![], vec![StateMutation::info(notice)])
        }
        Err(error) => {
            warn!(%error, session = %id, "rename failed");
            registry.last_error = Some(error.clone());
            (
                vec![],
                vec![StateMutation::error(format!(
                    "Could not rename {}: {error}",
                    id.short()
                ))],
            )
        }
    }
}
