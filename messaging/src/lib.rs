//! Messaging crate: reliable queue publishing and consuming for the
//! pet-simulation backend.
//!
//! ## Modules
//!
//! - [`error`] – queue, publish and handler error types
//! - [`message`] – transport message and logical envelope
//! - [`queue`] – the queue boundary traits (client/sender/processor)
//! - [`publisher`] – publisher with bounded exponential-backoff retry
//! - [`receiver`] – receive loop with type-tag dispatch
//! - [`memory_queue`] – in-memory queue transport

pub mod error;
pub mod memory_queue;
pub mod message;
pub mod publisher;
pub mod queue;
pub mod receiver;

#[cfg(test)]
mod publisher_test;
#[cfg(test)]
mod receiver_test;

pub use error::{HandlerError, PublishError, QueueError};
pub use memory_queue::InMemoryQueue;
pub use message::{MessageEnvelope, QueueMessage};
pub use publisher::{PublisherOptions, QueuePublisher, RetryPolicy};
pub use queue::{
    Disposition, MessageHandler, QueueClient, QueueProcessor, QueueSender, TransportErrorHandler,
};
pub use receiver::{EventDispatcher, EventHandler, QueueReceiver};
