use tokio::sync::mpsc;

use crate::events::ChatEvent;

/// Sender for the runtime's completion inbox.
pub type ChatEventSender = mpsc::UnboundedSender<ChatEvent>;

/// Receiver for the runtime's completion inbox.
pub type ChatEventReceiver = mpsc::UnboundedReceiver<ChatEvent>;
