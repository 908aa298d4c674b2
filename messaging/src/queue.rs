//! The queue boundary.
//!
//! Publishers and receivers depend only on these traits; transports
//! (the in-memory queue here, a hosted broker elsewhere) implement them.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::QueueError;
use crate::message::QueueMessage;

/// What the handler wants done with a processed message. `Complete` removes
/// it from the queue; `Abandon` leaves it for redelivery under the
/// transport's own semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Complete,
    Abandon,
}

/// Sends single messages to one queue.
#[async_trait]
pub trait QueueSender: Send + Sync {
    async fn send(&self, message: QueueMessage) -> Result<(), QueueError>;
}

/// Processes messages delivered by a [`QueueProcessor`].
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: QueueMessage) -> Disposition;
}

/// Receives transport-level errors; must not terminate the receive loop.
#[async_trait]
pub trait TransportErrorHandler: Send + Sync {
    async fn on_error(&self, error: QueueError);
}

/// A long-running receive loop over one queue or topic subscription.
#[async_trait]
pub trait QueueProcessor: Send + Sync {
    async fn start(
        &self,
        handler: Arc<dyn MessageHandler>,
        error_handler: Arc<dyn TransportErrorHandler>,
    ) -> Result<(), QueueError>;

    async fn stop(&self) -> Result<(), QueueError>;
}

/// Entry point to a queue transport. Senders and processors share the
/// client's long-lived connection and are safe for concurrent use.
pub trait QueueClient: Send + Sync {
    fn create_sender(&self, queue_name: &str) -> Arc<dyn QueueSender>;

    fn create_processor(
        &self,
        queue_or_topic: &str,
        subscription: Option<&str>,
    ) -> Arc<dyn QueueProcessor>;
}
