//! Application state composition.
//!
//! ```text
//! AppState
//! ├── registry: RegistryState   (cached session list)
//! ├── session: SessionState     (the one open conversation)
//! ├── seed: SeedState           (document handoff + seed job)
//! ├── task_seq: TaskSeq         (async task id generator)
//! └── notices: Vec<Notice>      (user-visible notifications)
//! ```
//!
//! Each slice is written only by its own reducer; cross-slice changes go
//! through [`crate::mutations::StateMutation`].

use std::fmt;

use crate::api::ListQuery;
use crate::common::TaskSeq;
use crate::config::Config;
use crate::model::{Message, SessionId, SessionSummary};
use crate::registry::RegistryState;
use crate::seed::SeedState;
use crate::session::{Phase, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub struct AppState {
    pub config: Config,
    pub registry: RegistryState,
    pub session: SessionState,
    pub seed: SeedState,
    pub task_seq: TaskSeq,
    pub notices: Vec<Notice>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let query = ListQuery {
            page_size: config.effective_page_size(),
            ..ListQuery::default()
        };
        Self {
            registry: RegistryState::new(query),
            session: SessionState::new(),
            seed: SeedState::new(config.seed.clone()),
            task_seq: TaskSeq::default(),
            notices: Vec::new(),
            config,
        }
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Immutable view for the presentation layer.
    pub fn snapshot(&self) -> Snapshot {
        let session_id = self.session.session_id().cloned();
        let title = session_id
            .as_ref()
            .and_then(|id| self.registry.get(id))
            .map(SessionSummary::display_title);
        Snapshot {
            phase: self.session.phase(),
            session_id,
            title,
            messages: self.session.messages().to_vec(),
            retry_input: self.session.retry_input().map(str::to_string),
            last_error: self.session.last_error().map(str::to_string),
            sessions: self.registry.sessions().to_vec(),
            refreshing: self.registry.is_refreshing(),
            seeding: self.seed.is_seeding(),
        }
    }
}

/// Point-in-time copy of everything the presentation layer renders.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub phase: Phase,
    pub session_id: Option<SessionId>,
    /// Title of the active session, looked up in the registry by id.
    pub title: Option<String>,
    pub messages: Vec<Message>,
    pub retry_input: Option<String>,
    pub last_error: Option<String>,
    pub sessions: Vec<SessionSummary>,
    pub refreshing: bool,
    pub seeding: bool,
}

impl Snapshot {
    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }
}
