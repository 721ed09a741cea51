//! Document-seeded conversations.

mod state;
pub mod update;

pub use state::{DocumentContext, HandoffSlot, SeedState};
