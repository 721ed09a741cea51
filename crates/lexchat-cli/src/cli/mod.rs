//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lexchat_core::config;
use lexchat_core::logging;
use lexchat_core::model::SessionType;

mod commands;

#[derive(Parser)]
#[command(name = "lexchat")]
#[command(version)]
#[command(about = "Converse with a legal document assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend API base URL (overrides config and LEXCHAT_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Chat {
        /// Resume an existing session by ID
        #[arg(long, value_name = "ID", conflicts_with = "document")]
        session: Option<String>,

        /// Start a document conversation from a text file
        #[arg(long, value_name = "FILE")]
        document: Option<PathBuf>,

        /// Backend document ID to attach to the seeded session
        #[arg(long, value_name = "ID", requires = "document")]
        document_id: Option<String>,
    },

    /// Manage chat sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Ask a one-off question without creating a session
    Ask {
        /// The question (at least 3 characters)
        #[arg(value_name = "QUERY", required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show chat usage statistics
    Stats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// Lists sessions, most recently active first
    List {
        /// Only list sessions of this type (general, document)
        #[arg(long = "type", value_name = "TYPE")]
        session_type: Option<SessionType>,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Shows a session's messages
    Show {
        #[arg(value_name = "SESSION_ID")]
        id: String,
    },
    /// Deletes a session
    Delete {
        #[arg(value_name = "SESSION_ID")]
        id: String,
    },
    /// Renames a session
    Rename {
        #[arg(value_name = "SESSION_ID")]
        id: String,
        /// New title for the session
        #[arg(value_name = "TITLE")]
        title: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, base_url } = cli;

    // Config commands must work even when the config file is broken.
    if let Some(Commands::Config { command }) = &command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        };
    }

    let mut config = config::Config::load().context("load config")?;
    if let Some(url) = base_url {
        config.base_url = url;
    }
    let _log_guard = logging::init(&config.log).context("init logging")?;
    tracing::debug!(base_url = %config.base_url, "config loaded");

    // default to chat mode
    let Some(command) = command else {
        return commands::chat::run(config, None, None, None).await;
    };

    match command {
        Commands::Chat {
            session,
            document,
            document_id,
        } => commands::chat::run(config, session, document, document_id).await,

        Commands::Sessions { command } => match command {
            SessionCommands::List { session_type, page } => {
                commands::sessions::list(&config, session_type, page).await
            }
            SessionCommands::Show { id } => commands::sessions::show(&config, &id).await,
            SessionCommands::Delete { id } => commands::sessions::delete(&config, &id).await,
            SessionCommands::Rename { id, title } => {
                commands::sessions::rename(&config, &id, &title).await
            }
        },

        Commands::Ask { query } => commands::ask::run(&config, &query.join(" ")).await,

        Commands::Stats => commands::stats::run(&config).await,

        Commands::Config { .. } => Ok(()),
    }
}
