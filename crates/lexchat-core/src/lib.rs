//! Core lexchat library (model, backend client, config, session orchestration).
//!
//! The orchestration follows an Elm-style split:
//! - `state` holds the slices (registry, active session, seeder)
//! - `update` is the pure reducer returning `ChatEffect`s
//! - `runtime` executes effects against the backend and feeds results back

pub mod api;
pub mod common;
pub mod config;
pub mod effects;
pub mod events;
pub mod features;
pub mod logging;
pub mod model;
pub mod mutations;
pub mod prompts;
pub mod runtime;
pub mod state;
pub mod update;

pub use features::{registry, seed, session};
