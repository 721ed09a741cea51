//! Request tokens for conversation-scoped async results.

use crate::common::TaskId;
use crate::model::SessionId;

/// What the in-flight conversation request is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Implicit create before the first message of a draft.
    Create,
    /// Posting a user message.
    Send,
    /// Fetching history for a session switch.
    Load,
    /// Creating a document session from a handoff.
    SeedCreate,
    /// Posting the composed seed prompt.
    SeedPrompt,
}

/// Captures the conversation a backend call was issued for.
///
/// Carried through the effect and back on the completion event. A response
/// is applied only if [`PendingRequest::matches`] still holds when it
/// arrives; otherwise it is discarded silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub task: TaskId,
    pub kind: RequestKind,
    /// Active session id when the call was issued (`None` for a draft).
    pub session_id: Option<SessionId>,
}

impl PendingRequest {
    pub fn new(task: TaskId, kind: RequestKind, session_id: Option<SessionId>) -> Self {
        Self {
            task,
            kind,
            session_id,
        }
    }

    /// True when this token is the in-flight request of the conversation
    /// that is active right now.
    pub fn matches(&self, in_flight: Option<&PendingRequest>, active: Option<&SessionId>) -> bool {
        in_flight.is_some_and(|current| current.task == self.task)
            && self.session_id.as_ref() == active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(task: u64, session: Option<&str>) -> PendingRequest {
        PendingRequest::new(TaskId(task), RequestKind::Send, session.map(SessionId::from))
    }

    #[test]
    fn test_matches_requires_same_task_and_session() {
        let current = token(1, Some("s1"));
        let active = SessionId::new("s1");
        assert!(current.matches(Some(&current), Some(&active)));

        let other_session = SessionId::new("s2");
        assert!(!current.matches(Some(&current), Some(&other_session)));
        assert!(!current.matches(Some(&current), None));
    }

    #[test]
    fn test_superseded_task_never_matches() {
        let stale = token(1, Some("s1"));
        let newer = token(2, Some("s1"));
        let active = SessionId::new("s1");
        assert!(!stale.matches(Some(&newer), Some(&active)));
        assert!(!stale.matches(None, Some(&active)));
    }

    #[test]
    fn test_draft_token_matches_draft() {
        let create = PendingRequest::new(TaskId(3), RequestKind::Create, None);
        assert!(create.matches(Some(&create), None));
    }
}
