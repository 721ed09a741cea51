//! Runtime execution modes.
//!
//! - `repl`: line-oriented interactive chat on stdin/stdout

mod repl;

pub use repl::{ChatStart, run_interactive_chat};
