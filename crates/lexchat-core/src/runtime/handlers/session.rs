use tracing::debug;

use crate::api::BackendClient;
use crate::common::PendingRequest;
use crate::events::{ChatEvent, SessionEvent};
use crate::model::SessionId;

/// Fetches the full history of `id`.
pub async fn load_history(client: BackendClient, token: PendingRequest, id: SessionId) -> ChatEvent {
    let result = match client.get_session(&id).await {
        Ok(detail) => {
            debug!(session = %id, count = detail.messages.len(), "history fetched");
            Ok(detail.messages)
        }
        Err(e) => {
            debug!(error = %e, session = %id, "load history failed");
            Err(e.to_string())
        }
    };
    ChatEvent::Session(SessionEvent::Loaded { token, result })
}

/// Posts one user message and returns the assistant reply.
pub async fn post_message(
    client: BackendClient,
    token: PendingRequest,
    id: SessionId,
    content: String,
) -> ChatEvent {
    let result = client.send_message(&id, &content).await.map_err(|e| {
        debug!(error = %e, session = %id, "post message failed");
        e.to_string()
    });
    ChatEvent::Session(SessionEvent::Replied { token, result })
}
