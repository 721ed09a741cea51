//! Shared primitives for async request tracking.

mod request;
mod task;

pub use request::{PendingRequest, RequestKind};
pub use task::{TaskId, TaskSeq, TaskState};
