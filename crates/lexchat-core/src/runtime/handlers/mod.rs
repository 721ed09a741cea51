//! Effect handlers.
//!
//! Each handler performs exactly one backend call and returns the completion
//! `ChatEvent`. Handlers never touch state; the runtime spawns them and sends
//! their result to the inbox.

mod registry;
mod session;

pub use registry::*;
pub use session::*;
