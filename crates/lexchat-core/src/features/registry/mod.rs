//! Cached list of backend sessions.

mod state;
pub mod update;

pub use state::RegistryState;
