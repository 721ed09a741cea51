//! Chat runtime: owns state, executes effects.
//!
//! This is the Elm runtime boundary: all backend I/O happens here. The
//! reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! - every effect is spawned as one tokio task running a handler
//! - the handler's completion `ChatEvent` is sent to `inbox_tx`
//! - [`ChatRuntime::next_event`] receives one completion and dispatches it
//!
//! The runtime counts spawned tasks, so callers can tell when nothing is
//! left to wait for ([`ChatRuntime::settle`]).

mod handlers;
mod inbox;

use std::future::Future;

use anyhow::{Context, Result};
use inbox::{ChatEventReceiver, ChatEventSender};
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::BackendClient;
use crate::config::Config;
use crate::effects::ChatEffect;
use crate::events::ChatEvent;
use crate::state::{AppState, Notice, Snapshot};
use crate::update;

pub struct ChatRuntime {
    state: AppState,
    client: BackendClient,
    /// Inbox sender; cloned into every spawned handler.
    inbox_tx: ChatEventSender,
    inbox_rx: ChatEventReceiver,
    /// Spawned handlers whose completion has not been dispatched yet.
    in_flight: usize,
}

impl ChatRuntime {
    /// Builds a runtime with a backend client configured from `config`.
    pub fn new(config: Config) -> Result<Self> {
        let client = BackendClient::from_config(&config)
            .with_context(|| format!("Failed to create backend client for {}", config.base_url))?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: Config, client: BackendClient) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(config),
            client,
            inbox_tx,
            inbox_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.state.drain_notices()
    }

    /// True while any backend call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Runs the reducer on `event` and spawns the effects it returns.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, event: ChatEvent) {
        let effects = update::update(&mut self.state, event);
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Waits for one backend call to finish and applies its result.
    ///
    /// Returns false immediately when nothing is in flight. Cancel safe: a
    /// completion is either fully dispatched or left in the inbox.
    pub async fn next_event(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        let Some(event) = self.inbox_rx.recv().await else {
            self.in_flight = 0;
            return false;
        };
        self.in_flight -= 1;
        self.dispatch(event);
        true
    }

    /// Dispatches completions until no backend call is outstanding,
    /// including calls spawned by earlier completions.
    pub async fn settle(&mut self) {
        while self.next_event().await {}
    }

    fn spawn_effect<F, Fut>(&mut self, f: F)
    where
        F: FnOnce(BackendClient) -> Fut + Send + 'static,
        Fut: Future<Output = ChatEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let client = self.client.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let _ = tx.send(f(client).await);
        });
    }

    fn execute_effect(&mut self, effect: ChatEffect) {
        debug!(?effect, "execute effect");
        match effect {
            ChatEffect::ListSessions { task, query } => {
                self.spawn_effect(move |client| handlers::list_sessions(client, task, query));
            }
            ChatEffect::CreateSession { origin, request } => {
                self.spawn_effect(move |client| handlers::create_session(client, origin, request));
            }
            ChatEffect::LoadHistory { token, id } => {
                self.spawn_effect(move |client| handlers::load_history(client, token, id));
            }
            ChatEffect::PostMessage { token, id, content } => {
                self.spawn_effect(move |client| handlers::post_message(client, token, id, content));
            }
            ChatEffect::DeleteSession { task, id } => {
                self.spawn_effect(move |client| handlers::delete_session(client, task, id));
            }
            ChatEffect::RenameSession { task, id, title } => {
                self.spawn_effect(move |client| {
                    handlers::rename_session(client, task, id, title)
                });
            }
        }
    }
}
