//! Main reducer.
//!
//! All state changes happen here. The runtime calls `update(app, event)` and
//! executes the returned effects. Feature reducers return mutations for
//! other slices; those are applied in order before returning.

use tracing::{trace, warn};

use crate::common::RequestKind;
use crate::effects::ChatEffect;
use crate::events::{ChatEvent, RegistryEvent, SessionEvent};
use crate::mutations::{RegistryMutation, StateMutation};
use crate::state::AppState;
use crate::{registry, seed, session};

pub fn update(app: &mut AppState, event: ChatEvent) -> Vec<ChatEffect> {
    trace!(?event, "update");
    let (mut effects, mutations) = match event {
        ChatEvent::SendMessage { text } => session::update::send_message(
            &mut app.session,
            &mut app.task_seq,
            text,
            &app.config.default_title,
        ),
        ChatEvent::Retry => {
            session::update::retry(&mut app.session, &mut app.task_seq, &app.config.default_title)
        }
        ChatEvent::LoadSession { id } => {
            session::update::load_session(&mut app.session, &mut app.task_seq, id)
        }
        ChatEvent::NewChat => session::update::new_chat(&mut app.session),

        ChatEvent::RefreshSessions => (
            registry::update::refresh(&mut app.registry, &mut app.task_seq),
            vec![],
        ),
        ChatEvent::CreateSession {
            title,
            session_type,
            document_id,
        } => registry::update::create(
            &mut app.registry,
            &mut app.task_seq,
            title,
            session_type,
            document_id,
        ),
        ChatEvent::DeleteSession { id } => {
            registry::update::delete(&mut app.registry, &mut app.task_seq, id)
        }
        ChatEvent::RenameSession { id, title } => {
            registry::update::rename(&mut app.registry, &mut app.task_seq, id, title)
        }

        ChatEvent::OfferDocument(context) => seed::update::offer(&mut app.seed, context),
        ChatEvent::SeedFromHandoff => {
            seed::update::seed_from_handoff(&mut app.seed, &mut app.task_seq)
        }

        ChatEvent::Registry(event) => handle_registry_event(app, event),
        ChatEvent::Session(event) => handle_session_event(app, event),
    };

    effects.extend(apply_mutations(app, mutations));
    effects
}

fn handle_registry_event(
    app: &mut AppState,
    event: RegistryEvent,
) -> (Vec<ChatEffect>, Vec<StateMutation>) {
    let registry = &mut app.registry;
    match event {
        RegistryEvent::Listed { task, result } => {
            registry::update::handle_listed(registry, &mut app.task_seq, task, result)
        }
        RegistryEvent::Created { task, result } => {
            registry::update::handle_created(registry, task, result)
        }
        RegistryEvent::Deleted { task, id, result } => {
            registry::update::handle_deleted(registry, task, id, result)
        }
        RegistryEvent::Renamed { task, id, result } => {
            registry::update::handle_renamed(registry, task, id, result)
        }
    }
}

/// Routes a conversation completion by the kind of request its token names.
fn handle_session_event(
    app: &mut AppState,
    event: SessionEvent,
) -> (Vec<ChatEffect>, Vec<StateMutation>) {
    let kind = event.token().kind;
    match (kind, event) {
        (RequestKind::Create, SessionEvent::Created { token, result }) => {
            session::update::handle_created(&mut app.session, &mut app.task_seq, &token, result)
        }
        (RequestKind::Send, SessionEvent::Replied { token, result }) => {
            session::update::handle_replied(&mut app.session, &token, result)
        }
        (RequestKind::Load, SessionEvent::Loaded { token, result }) => {
            session::update::handle_loaded(&mut app.session, &token, result)
        }
        (RequestKind::SeedCreate, SessionEvent::Created { token, result }) => {
            seed::update::handle_created(
                &mut app.seed,
                &app.session,
                &mut app.task_seq,
                &token,
                result,
            )
        }
        (RequestKind::SeedPrompt, SessionEvent::Replied { token, result }) => {
            seed::update::handle_replied(&mut app.seed, &app.session, &token, result)
        }
        (kind, event) => {
            warn!(?kind, ?event, "completion does not match its request kind");
            (vec![], vec![])
        }
    }
}

/// Applies cross-slice mutations. Registry requests can spawn effects.
fn apply_mutations(app: &mut AppState, mutations: Vec<StateMutation>) -> Vec<ChatEffect> {
    let mut effects = Vec::new();
    for mutation in mutations {
        match mutation {
            StateMutation::Session(mutation) => app.session.apply(mutation),
            StateMutation::Registry(RegistryMutation::Refresh) => {
                effects.extend(registry::update::refresh(&mut app.registry, &mut app.task_seq));
            }
            StateMutation::Registry(RegistryMutation::DiscardOrphan(id)) => {
                let (more, nested) =
                    registry::update::discard_orphan(&mut app.registry, &mut app.task_seq, id);
                effects.extend(more);
                effects.extend(apply_mutations(app, nested));
            }
            StateMutation::Notify(notice) => app.push_notice(notice),
        }
    }
    effects
}
