//! Line-oriented interactive chat.
//!
//! Acts as the presentation layer over `ChatRuntime`: each input line becomes
//! an intent, and after every input or backend completion the latest snapshot
//! is rendered incrementally (only messages not yet printed).

use anyhow::{Context, Result};
use lexchat_core::config::Config;
use lexchat_core::events::ChatEvent;
use lexchat_core::model::{SessionId, SessionSummary};
use lexchat_core::runtime::ChatRuntime;
use lexchat_core::seed::DocumentContext;
use lexchat_core::session::Phase;
use lexchat_core::state::{NoticeLevel, Snapshot};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;

const HELP: &str = "\
Commands:
  /new                    start a new conversation
  /sessions               refresh and list conversations
  /open <id|n>            open a conversation (n = number from /sessions)
  /delete <id|n>          delete a conversation
  /rename <id|n> <title>  rename a conversation
  /retry                  resend the last message that failed
  /help                   show this help
  /quit                   exit
Anything else is sent as a message.";

/// How the conversation starts.
pub enum ChatStart {
    Draft,
    Resume(SessionId),
    Document(DocumentContext),
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Empty,
    Send(String),
    New,
    Sessions,
    Open(String),
    Delete(String),
    Rename(String, String),
    Retry,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Send(line.to_string());
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, rest)| (name, rest.trim()));

    match (name, rest) {
        ("new", "") => Input::New,
        ("sessions" | "ls", "") => Input::Sessions,
        ("open", target) if !target.is_empty() => Input::Open(target.to_string()),
        ("delete" | "rm", target) if !target.is_empty() => Input::Delete(target.to_string()),
        ("rename", args) => match args.split_once(char::is_whitespace) {
            Some((target, title)) if !title.trim().is_empty() => {
                Input::Rename(target.to_string(), title.trim().to_string())
            }
            _ => Input::Unknown(line.to_string()),
        },
        ("retry", "") => Input::Retry,
        ("help" | "?", "") => Input::Help,
        ("quit" | "exit" | "q", "") => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

/// Tracks what has already been printed.
#[derive(Default)]
struct View {
    session_id: Option<SessionId>,
    printed: usize,
    phase: Option<Phase>,
    /// Sessions as last shown by `/sessions`, for numeric references.
    listing: Vec<SessionSummary>,
}

impl View {
    fn render(&mut self, snapshot: &Snapshot) {
        let first = self.phase.is_none();
        if first || snapshot.session_id != self.session_id {
            match (&snapshot.session_id, snapshot.phase) {
                (Some(id), _) => {
                    let title = snapshot.title.clone().unwrap_or_else(|| id.short());
                    println!("\n── {title} ({id}) ──");
                }
                (None, Phase::Draft) if !first => println!("\n── new conversation ──"),
                (None, _) => {}
            }
            self.printed = 0;
        }
        self.session_id.clone_from(&snapshot.session_id);

        // Rolled back or reset: the notice explains it.
        self.printed = self.printed.min(snapshot.messages.len());
        for message in &snapshot.messages[self.printed..] {
            println!("{}\n", render::message(message));
        }
        self.printed = snapshot.messages.len();

        if snapshot.is_pending() && self.phase != Some(Phase::Pending) {
            println!("…");
        }
        self.phase = Some(snapshot.phase);
    }

    /// Resolves a `/sessions` index or a raw id.
    fn resolve(&self, target: &str) -> SessionId {
        target
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.listing.get(i))
            .map_or_else(|| SessionId::new(target), |s| s.id.clone())
    }
}

fn print_notices(runtime: &mut ChatRuntime) {
    for notice in runtime.drain_notices() {
        match notice.level {
            NoticeLevel::Error => eprintln!("! {notice}"),
            NoticeLevel::Info => eprintln!("· {notice}"),
        }
    }
}

fn print_sessions(view: &mut View, snapshot: &Snapshot) {
    if snapshot.sessions.is_empty() {
        println!("No sessions yet.");
    }
    for (i, summary) in snapshot.sessions.iter().enumerate() {
        let marker = if snapshot.session_id.as_ref() == Some(&summary.id) {
            "*"
        } else {
            " "
        };
        println!("{marker}{:>3}. {}", i + 1, render::session_line(summary));
    }
    view.listing.clone_from(&snapshot.sessions);
}

/// Runs the chat loop until `/quit` or end of input.
pub async fn run_interactive_chat(config: Config, start: ChatStart) -> Result<()> {
    let mut runtime = ChatRuntime::new(config).context("start chat runtime")?;
    let mut view = View::default();

    runtime.dispatch(ChatEvent::RefreshSessions);
    match start {
        ChatStart::Draft => {}
        ChatStart::Resume(id) => runtime.dispatch(ChatEvent::LoadSession { id }),
        ChatStart::Document(context) => {
            runtime.dispatch(ChatEvent::OfferDocument(context));
            runtime.dispatch(ChatEvent::SeedFromHandoff);
        }
    }
    println!("lexchat: connected to {}. Type /help for commands.", runtime.client().base_url());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    // `/sessions` waits for its refresh so numbers resolve against fresh data.
    let mut listing_requested = false;

    loop {
        let snapshot = runtime.snapshot();
        view.render(&snapshot);
        print_notices(&mut runtime);
        if listing_requested && !snapshot.refreshing {
            listing_requested = false;
            print_sessions(&mut view, &snapshot);
        }

        if !stdin_open && !runtime.is_busy() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("read input")? else {
                    stdin_open = false;
                    continue;
                };
                match parse_input(&line) {
                    Input::Empty => {}
                    Input::Quit => break,
                    Input::Help => println!("{HELP}"),
                    Input::Send(text) => {
                        if runtime.snapshot().is_pending() {
                            eprintln!("! Still waiting for the previous reply.");
                        } else {
                            runtime.dispatch(ChatEvent::SendMessage { text });
                        }
                    }
                    Input::Retry => match runtime.snapshot().retry_input {
                        Some(_) => runtime.dispatch(ChatEvent::Retry),
                        None => eprintln!("! Nothing to retry."),
                    },
                    Input::New => runtime.dispatch(ChatEvent::NewChat),
                    Input::Sessions => {
                        runtime.dispatch(ChatEvent::RefreshSessions);
                        listing_requested = true;
                    }
                    Input::Open(target) => {
                        let id = view.resolve(&target);
                        runtime.dispatch(ChatEvent::LoadSession { id });
                    }
                    Input::Delete(target) => {
                        let id = view.resolve(&target);
                        runtime.dispatch(ChatEvent::DeleteSession { id });
                    }
                    Input::Rename(target, title) => {
                        let id = view.resolve(&target);
                        runtime.dispatch(ChatEvent::RenameSession { id, title });
                    }
                    Input::Unknown(line) => eprintln!("! Unknown command: {line} (try /help)"),
                }
            }
            _ = runtime.next_event(), if runtime.is_busy() => {}
        }
    }

    Ok(())
}
