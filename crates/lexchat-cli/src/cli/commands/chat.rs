//! Interactive chat handler.

use std::path::PathBuf;

use anyhow::{Context, Result};
use lexchat_core::config::Config;
use lexchat_core::model::SessionId;
use lexchat_core::seed::DocumentContext;

use crate::modes::{self, ChatStart};

pub async fn run(
    config: Config,
    session: Option<String>,
    document: Option<PathBuf>,
    document_id: Option<String>,
) -> Result<()> {
    let start = match (session, document) {
        (Some(id), _) => ChatStart::Resume(SessionId::new(id)),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("read document {}", path.display()))?;
            let mut context = DocumentContext::new(text);
            if let Some(name) = path.file_name() {
                context = context.with_document_name(name.to_string_lossy());
            }
            if let Some(id) = document_id {
                context = context.with_document_id(id);
            }
            ChatStart::Document(context)
        }
        (None, None) => ChatStart::Draft,
    };

    modes::run_interactive_chat(config, start)
        .await
        .context("chat failed")
}
