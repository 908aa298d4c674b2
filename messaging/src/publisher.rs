//! Queue publisher with bounded exponential-backoff retry.
//!
//! The retry policy is an explicit loop: a transient fault sleeps
//! `base_delay * 2^(attempt-1)` and tries again up to `max_retries` extra
//! attempts; permanent faults short-circuit. Each retry is logged with the
//! attempt count, the delay and the transaction id so one logical send can
//! be traced across physical attempts.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{PublishError, QueueError};
use crate::message::QueueMessage;
use crate::queue::{QueueClient, QueueSender};

/// Retry budget for transient send faults.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts beyond the first.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt after `attempt` (1-based): 2s, 4s, 8s with
    /// the default base.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

#[derive(Debug, Clone)]
pub struct PublisherOptions {
    pub retry: RetryPolicy,
    /// Upper bound on a single physical send; an elapsed timeout counts as
    /// a transient fault.
    pub send_timeout: Duration,
}

impl Default for PublisherOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            send_timeout: Duration::from_secs(30),
        }
    }
}

/// Hands a domain-event payload to a named queue, reliably.
pub struct QueuePublisher {
    queue_name: String,
    sender: Arc<dyn QueueSender>,
    options: PublisherOptions,
}

impl QueuePublisher {
    pub fn new(client: &dyn QueueClient, queue_name: &str) -> Self {
        Self::from_sender(queue_name, client.create_sender(queue_name))
    }

    pub fn from_sender(queue_name: &str, sender: Arc<dyn QueueSender>) -> Self {
        Self {
            queue_name: queue_name.to_string(),
            sender,
            options: PublisherOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PublisherOptions) -> Self {
        self.options = options;
        self
    }

    /// Serializes the payload, wraps it in a transport message tagged with
    /// `message_type` and correlated by `transaction_id`, and sends it under
    /// the retry policy.
    pub async fn send<T: Serialize>(
        &self,
        message_type: &str,
        payload: &T,
        transaction_id: &str,
    ) -> Result<(), PublishError> {
        let body = serde_json::to_vec(payload).map_err(|e| {
            error!(transaction_id, "failed to serialize message payload: {}", e);
            PublishError::Serialization(e)
        })?;
        let message = QueueMessage::new(message_type, body, transaction_id);

        info!(
            transaction_id,
            "preparing to send message to '{}'", self.queue_name
        );

        let mut attempt: u32 = 1;
        loop {
            let result = match tokio::time::timeout(
                self.options.send_timeout,
                self.sender.send(message.clone()),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(QueueError::Timeout),
            };

            match result {
                Ok(()) => {
                    info!(
                        transaction_id,
                        "message successfully sent to '{}'", self.queue_name
                    );
                    return Ok(());
                }
                Err(e) if e.is_transient() => {
                    if attempt > self.options.retry.max_retries {
                        error!(
                            transaction_id,
                            "giving up sending message to '{}' after {} attempts: {}",
                            self.queue_name,
                            attempt,
                            e
                        );
                        return Err(PublishError::RetriesExhausted {
                            attempts: attempt,
                            source: e,
                        });
                    }
                    let delay = self.options.retry.backoff(attempt);
                    warn!(
                        transaction_id,
                        "retry {} for sending message to '{}' due to {}; waiting {:?} before next attempt",
                        attempt,
                        self.queue_name,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(QueueError::EntityNotFound(_)) => {
                    error!(
                        transaction_id,
                        "queue '{}' does not exist", self.queue_name
                    );
                    return Err(PublishError::EntityNotFound(self.queue_name.clone()));
                }
                Err(QueueError::Unauthorized(reason)) => {
                    error!(
                        transaction_id,
                        "access denied sending to '{}': {}", self.queue_name, reason
                    );
                    return Err(PublishError::Unauthorized(reason));
                }
                Err(e) => {
                    error!(
                        transaction_id,
                        "unexpected error sending message to '{}': {}", self.queue_name, e
                    );
                    return Err(PublishError::Queue(e));
                }
            }
        }
    }
}
