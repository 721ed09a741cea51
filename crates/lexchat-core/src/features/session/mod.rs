//! The active conversation.

mod state;
pub mod update;

pub use state::{Phase, SessionState};
