//! Usage statistics handler.

use anyhow::{Context, Result};
use lexchat_core::api::BackendClient;
use lexchat_core::config::Config;

pub async fn run(config: &Config) -> Result<()> {
    let client = BackendClient::from_config(config)
        .with_context(|| format!("create backend client for {}", config.base_url))?;
    let stats = client.stats().await.context("load chat stats")?;

    println!("Sessions: {}", stats.total_sessions);
    println!("Messages: {}", stats.total_messages);
    println!("Tokens:   {}", stats.total_tokens);
    for (kind, count) in &stats.by_type {
        println!("  {kind}: {count}");
    }
    Ok(())
}
