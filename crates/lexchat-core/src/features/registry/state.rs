//! Registry state: the cached session list and its request slots.

use std::collections::{HashMap, HashSet};

use crate::api::ListQuery;
use crate::common::{TaskId, TaskState};
use crate::model::{SessionId, SessionSummary, SessionType};

#[derive(Debug, Default)]
pub struct RegistryState {
    /// Server-ordered summaries, most recently active first.
    pub(super) sessions: Vec<SessionSummary>,
    pub(super) query: ListQuery,
    pub(super) list: TaskState,
    /// A refresh was requested while one was in flight.
    pub(super) refresh_queued: bool,
    pub(super) create: TaskState,
    pub(super) deletes: HashMap<SessionId, TaskId>,
    pub(super) renames: HashMap<SessionId, TaskId>,
    /// Deleted while the current list call was out; its response predates them.
    pub(super) deleted_during_list: HashSet<SessionId>,
    /// Deletes of sessions the user never saw; they produce no notices.
    pub(super) quiet_deletes: HashSet<SessionId>,
    pub(super) last_error: Option<String>,
    /// At least one list call has succeeded.
    pub(super) loaded: bool,
}

impl RegistryState {
    pub fn new(query: ListQuery) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    pub fn get(&self, id: &SessionId) -> Option<&SessionSummary> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Restricts future list calls to one session type (`None` lists all).
    pub fn set_session_type(&mut self, session_type: Option<SessionType>) {
        self.query.session_type = session_type;
    }

    pub fn is_refreshing(&self) -> bool {
        self.list.is_running()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_deleting(&self, id: &SessionId) -> bool {
        self.deletes.contains_key(id)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of registry calls still outstanding.
    pub fn in_flight(&self) -> usize {
        usize::from(self.list.is_running())
            + usize::from(self.create.is_running())
            + self.deletes.len()
            + self.renames.len()
    }

    pub(super) fn replace(&mut self, summary: SessionSummary) -> bool {
        match self.sessions.iter_mut().find(|s| s.id == summary.id) {
            Some(slot) => {
                *slot = summary;
                true
            }
            None => false,
        }
    }

    pub(super) fn remove(&mut self, id: &SessionId) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| &s.id != id);
        self.sessions.len() != before
    }
}
