//! Seeder state: the one-shot handoff slot and the job it started.

use std::collections::HashSet;

use crate::common::PendingRequest;
use crate::config::SeedConfig;

/// Document text handed over by the analysis workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentContext {
    pub text: String,
    /// Backend id of the analyzed document, attached to the created session.
    pub document_id: Option<String>,
    /// Used as the session title when present.
    pub document_name: Option<String>,
}

impl DocumentContext {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            document_id: None,
            document_name: None,
        }
    }

    #[must_use]
    pub fn with_document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_document_name(mut self, name: impl Into<String>) -> Self {
        self.document_name = Some(name.into());
        self
    }
}

/// Holds at most one undelivered handoff. Taking it empties the slot.
#[derive(Debug, Default)]
pub struct HandoffSlot {
    pending: Option<DocumentContext>,
    /// Every payload taken so far; re-offering any of them is dropped.
    consumed: HashSet<DocumentContext>,
}

impl HandoffSlot {
    /// Stores `context` for the next seed. Returns false when the same
    /// payload was already consumed, however long ago.
    pub fn offer(&mut self, context: DocumentContext) -> bool {
        if self.consumed.contains(&context) {
            return false;
        }
        self.pending = Some(context);
        true
    }

    pub fn take(&mut self) -> Option<DocumentContext> {
        let context = self.pending.take()?;
        self.consumed.insert(context.clone());
        Some(context)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Seed in progress.
#[derive(Debug, Clone)]
pub(super) struct SeedJob {
    pub token: PendingRequest,
    pub context: DocumentContext,
}

#[derive(Debug, Default)]
pub struct SeedState {
    pub(super) handoff: HandoffSlot,
    pub(super) job: Option<SeedJob>,
    pub(super) config: SeedConfig,
}

impl SeedState {
    pub fn new(config: SeedConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn handoff(&self) -> &HandoffSlot {
        &self.handoff
    }

    pub fn is_seeding(&self) -> bool {
        self.job.is_some()
    }

    /// True when `token` is the one the current seed job is waiting on.
    pub(super) fn owns(&self, token: &PendingRequest) -> bool {
        self.job.as_ref().is_some_and(|job| &job.token == token)
    }
}
