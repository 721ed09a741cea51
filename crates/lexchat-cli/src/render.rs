//! Plain-text formatting shared by one-shot commands and the chat mode.

use chrono::{DateTime, Local, Utc};
use lexchat_core::model::{Citation, Message, Role, SessionSummary};

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// One line per session: title, id, type, message count, last activity.
pub fn session_line(summary: &SessionSummary) -> String {
    let active = summary.updated_at.unwrap_or(summary.created_at);
    format!(
        "{}  {}  {}  {} msgs  {}",
        summary.display_title(),
        summary.id,
        summary.session_type.as_str(),
        summary.message_count,
        format_timestamp(active)
    )
}

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "assistant",
        Role::System => "system",
    }
}

pub fn citations(sources: &[Citation]) -> String {
    sources
        .iter()
        .map(|c| format!("  - {c}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn message(message: &Message) -> String {
    let mut out = format!("{}: {}", speaker(message.role), message.content.trim_end());
    if !message.citations().is_empty() {
        out.push_str("\n  sources:\n");
        out.push_str(&citations(message.citations()));
    }
    out
}

pub fn transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(message)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_lists_sources() {
        let mut reply = Message::assistant("See clause 4.\n");
        reply.sources = Some(vec![Citation {
            document: Some("lease.pdf".to_string()),
            page: Some(3),
            ..Default::default()
        }]);
        assert_eq!(
            message(&reply),
            "assistant: See clause 4.\n  sources:\n  - lease.pdf (p. 3)"
        );
    }

    #[test]
    fn test_transcript_separates_turns() {
        let text = transcript(&[Message::user("q"), Message::assistant("a")]);
        assert_eq!(text, "you: q\n\nassistant: a");
    }
}
