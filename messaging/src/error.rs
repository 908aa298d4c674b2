//! Error types for the messaging layer.
//!
//! Transient transport faults are expected to clear on retry; permanent ones
//! (bad entity name, auth failure) never will, so the publisher surfaces
//! them immediately as distinct [`PublishError`] variants.

use thiserror::Error;

/// Faults reported by a queue transport.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    #[error("the messaging service is busy")]
    ServiceBusy,

    #[error("messaging quota exceeded")]
    QuotaExceeded,

    #[error("queue request timed out")]
    Timeout,

    #[error("connection failure: {0}")]
    Connection(String),

    #[error("queue or topic '{0}' does not exist")]
    EntityNotFound(String),

    #[error("access to the messaging service was denied: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Other(String),
}

impl QueueError {
    /// True for the bounded set of faults the publisher retries.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            QueueError::ServiceBusy
                | QueueError::QuotaExceeded
                | QueueError::Timeout
                | QueueError::Connection(_)
        )
    }
}

/// Outcome of a publish call.
#[derive(Error, Debug)]
pub enum PublishError {
    /// A serialization bug will not fix itself on retry; reported
    /// immediately without touching the transport.
    #[error("failed to serialize message payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("queue or topic '{0}' does not exist")]
    EntityNotFound(String),

    #[error("access to the messaging service was denied: {0}")]
    Unauthorized(String),

    /// The retry budget ran out on a transient fault.
    #[error("send failed after {attempts} attempts: {source}")]
    RetriesExhausted { attempts: u32, source: QueueError },

    #[error("send failed: {0}")]
    Queue(QueueError),
}

/// Failure from an application-level event handler.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("{0}")]
    Failed(String),
}
