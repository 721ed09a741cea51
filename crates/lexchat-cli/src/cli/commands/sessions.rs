//! Session command handlers.

use anyhow::{Context, Result};
use lexchat_core::api::{BackendClient, ListQuery};
use lexchat_core::config::Config;
use lexchat_core::model::{SessionId, SessionType};

use crate::render;

fn client(config: &Config) -> Result<BackendClient> {
    BackendClient::from_config(config)
        .with_context(|| format!("create backend client for {}", config.base_url))
}

pub async fn list(config: &Config, session_type: Option<SessionType>, page: u32) -> Result<()> {
    let query = ListQuery {
        page: page.max(1),
        page_size: config.effective_page_size(),
        session_type,
    };
    let sessions = client(config)?
        .list_sessions(&query)
        .await
        .context("list sessions")?;
    if sessions.is_empty() {
        println!("No sessions found.");
    } else {
        for summary in &sessions {
            println!("{}", render::session_line(summary));
        }
    }
    Ok(())
}

pub async fn show(config: &Config, id: &str) -> Result<()> {
    let detail = client(config)?
        .get_session(&SessionId::new(id))
        .await
        .with_context(|| format!("load session '{id}'"))?;
    if let Some(summary) = &detail.session {
        println!("{}\n", render::session_line(summary));
    }
    if detail.messages.is_empty() {
        println!("Session '{id}' has no messages.");
    } else {
        println!("{}", render::transcript(&detail.messages));
    }
    Ok(())
}

pub async fn delete(config: &Config, id: &str) -> Result<()> {
    client(config)?
        .delete_session(&SessionId::new(id))
        .await
        .with_context(|| format!("delete session '{id}'"))?;
    println!("Deleted session {id}");
    Ok(())
}

pub async fn rename(config: &Config, id: &str, title: &str) -> Result<()> {
    let summary = client(config)?
        .rename_session(&SessionId::new(id), title)
        .await
        .with_context(|| format!("rename session '{id}'"))?;
    println!("Renamed session {} → {}", id, summary.display_title());
    Ok(())
}
