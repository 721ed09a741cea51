//! Quick query handler.

use anyhow::{Context, Result};
use lexchat_core::api::BackendClient;
use lexchat_core::config::Config;

use crate::render;

pub async fn run(config: &Config, query: &str) -> Result<()> {
    let client = BackendClient::from_config(config)
        .with_context(|| format!("create backend client for {}", config.base_url))?;
    let response = client.quick_query(query).await.context("quick query")?;

    println!("{}", response.answer.trim_end());
    if !response.sources.is_empty() {
        println!("\nSources:\n{}", render::citations(&response.sources));
    }
    if let (Some(tokens), Some(model)) = (response.tokens_used, response.model_used.as_deref()) {
        eprintln!("({tokens} tokens, {model})");
    }
    Ok(())
}
