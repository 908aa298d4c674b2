//! Receive loop with type-tag dispatch.
//!
//! The receiver attaches a dispatch handler and a logging error handler to a
//! transport processor. Dispatch decodes the envelope, looks the subject up
//! in the handler registry, completes the message on success and abandons it
//! on handler failure so the transport redelivers. Unknown message types and
//! malformed bodies are logged and completed — acknowledging them is the
//! alternative to letting a poison message loop forever.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{HandlerError, QueueError};
use crate::message::{MessageEnvelope, QueueMessage};
use crate::queue::{
    Disposition, MessageHandler, QueueClient, QueueProcessor, TransportErrorHandler,
};

/// An application-level handler for one message type.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, payload: &Value, transaction_id: &str) -> Result<(), HandlerError>;
}

/// Routes decoded envelopes to the handler registered for their type tag.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<String, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `message_type`, replacing any previous one.
    pub fn register(mut self, message_type: &str, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.insert(message_type.to_string(), handler);
        self
    }

    pub async fn dispatch(&self, message: &QueueMessage) -> Disposition {
        let envelope = match MessageEnvelope::from_message(message) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(
                    message_id = %message.message_id,
                    "discarding malformed message: {}", e
                );
                return Disposition::Complete;
            }
        };
        let transaction_id = envelope.transaction_id.as_str();

        match self.handlers.get(&envelope.message_type) {
            None => {
                warn!(
                    transaction_id,
                    "no handler for message type '{}'; completing", envelope.message_type
                );
                Disposition::Complete
            }
            Some(handler) => match handler.handle(&envelope.payload, transaction_id).await {
                Ok(()) => {
                    info!(
                        transaction_id,
                        "handled '{}' message", envelope.message_type
                    );
                    Disposition::Complete
                }
                Err(e) => {
                    // Left unacknowledged; the transport redelivers.
                    error!(
                        transaction_id,
                        "error processing '{}' message: {}", envelope.message_type, e
                    );
                    Disposition::Abandon
                }
            },
        }
    }
}

struct DispatchHandler {
    dispatcher: Arc<EventDispatcher>,
}

#[async_trait]
impl MessageHandler for DispatchHandler {
    async fn handle(&self, message: QueueMessage) -> Disposition {
        self.dispatcher.dispatch(&message).await
    }
}

struct LoggingErrorHandler;

#[async_trait]
impl TransportErrorHandler for LoggingErrorHandler {
    async fn on_error(&self, error: QueueError) {
        error!("error in queue processing: {}", error);
    }
}

/// Long-running consumer over one queue or topic subscription.
pub struct QueueReceiver {
    client: Arc<dyn QueueClient>,
    dispatcher: Arc<EventDispatcher>,
    processor: Mutex<Option<Arc<dyn QueueProcessor>>>,
}

impl QueueReceiver {
    pub fn new(client: Arc<dyn QueueClient>, dispatcher: EventDispatcher) -> Self {
        Self {
            client,
            dispatcher: Arc::new(dispatcher),
            processor: Mutex::new(None),
        }
    }

    /// Starts processing messages. Idempotent per receiver: a second call
    /// logs a warning and does nothing.
    pub async fn start_receiving(
        &self,
        queue_or_topic: &str,
        subscription: Option<&str>,
    ) -> Result<(), QueueError> {
        let processor = {
            let mut slot = self
                .processor
                .lock()
                .map_err(|_| QueueError::Other("receiver lock poisoned".to_string()))?;
            if slot.is_some() {
                warn!(
                    "message processing is already running for '{}'",
                    queue_or_topic
                );
                return Ok(());
            }
            let processor = self.client.create_processor(queue_or_topic, subscription);
            *slot = Some(processor.clone());
            processor
        };

        info!("starting message processing for '{}'", queue_or_topic);
        let result = processor
            .start(
                Arc::new(DispatchHandler {
                    dispatcher: self.dispatcher.clone(),
                }),
                Arc::new(LoggingErrorHandler),
            )
            .await;

        if result.is_err() {
            if let Ok(mut slot) = self.processor.lock() {
                *slot = None;
            }
        }
        result
    }

    /// Stops the processor, if one is running.
    pub async fn stop(&self) -> Result<(), QueueError> {
        let processor = self
            .processor
            .lock()
            .map_err(|_| QueueError::Other("receiver lock poisoned".to_string()))?
            .take();
        match processor {
            Some(processor) => processor.stop().await,
            None => Ok(()),
        }
    }
}
