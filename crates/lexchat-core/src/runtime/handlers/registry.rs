use tracing::{debug, info};

use crate::api::{BackendClient, CreateSessionRequest, ListQuery};
use crate::common::TaskId;
use crate::effects::CreateOrigin;
use crate::events::{ChatEvent, RegistryEvent};
use crate::model::SessionId;

pub async fn list_sessions(client: BackendClient, task: TaskId, query: ListQuery) -> ChatEvent {
    let result = client.list_sessions(&query).await.map_err(|e| {
        debug!(error = %e, "list sessions failed");
        e.to_string()
    });
    ChatEvent::Registry(RegistryEvent::Listed { task, result })
}

/// Creates a session and reports to whoever asked for it.
pub async fn create_session(
    client: BackendClient,
    origin: CreateOrigin,
    request: CreateSessionRequest,
) -> ChatEvent {
    let result = client.create_session(&request).await.map_err(|e| {
        debug!(error = %e, "create session failed");
        e.to_string()
    });
    if let Ok(summary) = &result {
        info!(session = %summary.id, session_type = summary.session_type.as_str(), "backend created session");
    }
    ChatEvent::session_created(origin, result)
}

pub async fn delete_session(client: BackendClient, task: TaskId, id: SessionId) -> ChatEvent {
    let result = match client.delete_session(&id).await {
        Ok(()) => Ok(()),
        // Already gone on the backend: the entry is stale either way.
        Err(e) if e.is_not_found() => {
            info!(session = %id, "session already deleted on backend");
            Ok(())
        }
        Err(e) => {
            debug!(error = %e, session = %id, "delete session failed");
            Err(e.to_string())
        }
    };
    ChatEvent::Registry(RegistryEvent::Deleted { task, id, result })
}

pub async fn rename_session(
    client: BackendClient,
    task: TaskId,
    id: SessionId,
    title: String,
) -> ChatEvent {
    let result = client.rename_session(&id, &title).await.map_err(|e| {
        debug!(error = %e, session = %id, "rename session failed");
        e.to_string()
    });
    ChatEvent::Registry(RegistryEvent::Renamed { task, id, result })
}
