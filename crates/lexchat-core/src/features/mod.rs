//! Feature slices (state/update per slice).

pub mod registry;
pub mod seed;
pub mod session;
