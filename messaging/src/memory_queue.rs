//! In-memory queue transport.
//!
//! Backs unit tests, single-process deployments and local development.
//! Models one queue per entity name with at-least-once delivery: abandoned
//! messages requeue at the back. Topic subscriptions share the underlying
//! queue (no fan-out).

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::QueueError;
use crate::message::QueueMessage;
use crate::queue::{
    Disposition, MessageHandler, QueueClient, QueueProcessor, QueueSender, TransportErrorHandler,
};

#[derive(Default)]
struct QueueState {
    messages: Mutex<VecDeque<QueueMessage>>,
    notify: Notify,
}

impl QueueState {
    fn push(&self, message: QueueMessage) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push_back(message);
        }
        self.notify.notify_one();
    }

    async fn pop(&self) -> QueueMessage {
        loop {
            // Register interest before checking so a push between the check
            // and the await still wakes us.
            let notified = self.notify.notified();
            if let Some(message) = self.messages.lock().ok().and_then(|mut m| m.pop_front()) {
                return message;
            }
            notified.await;
        }
    }

    fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }
}

/// Process-local [`QueueClient`] implementation.
#[derive(Default)]
pub struct InMemoryQueue {
    queues: Mutex<HashMap<String, Arc<QueueState>>>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages currently waiting on `queue_name`.
    pub fn pending(&self, queue_name: &str) -> usize {
        self.queues
            .lock()
            .ok()
            .and_then(|q| q.get(queue_name).map(|s| s.len()))
            .unwrap_or(0)
    }

    fn state(&self, queue_name: &str) -> Arc<QueueState> {
        let mut queues = match self.queues.lock() {
            Ok(queues) => queues,
            Err(poisoned) => poisoned.into_inner(),
        };
        queues
            .entry(queue_name.to_string())
            .or_insert_with(|| Arc::new(QueueState::default()))
            .clone()
    }
}

impl QueueClient for InMemoryQueue {
    fn create_sender(&self, queue_name: &str) -> Arc<dyn QueueSender> {
        Arc::new(InMemorySender {
            state: self.state(queue_name),
        })
    }

    fn create_processor(
        &self,
        queue_or_topic: &str,
        subscription: Option<&str>,
    ) -> Arc<dyn QueueProcessor> {
        if subscription.is_some() {
            warn!(
                "in-memory transport treats subscriptions on '{}' as the queue itself",
                queue_or_topic
            );
        }
        Arc::new(InMemoryProcessor {
            state: self.state(queue_or_topic),
            task: Mutex::new(None),
            shutdown: watch::channel(false).0,
        })
    }
}

struct InMemorySender {
    state: Arc<QueueState>,
}

#[async_trait]
impl QueueSender for InMemorySender {
    async fn send(&self, message: QueueMessage) -> Result<(), QueueError> {
        self.state.push(message);
        Ok(())
    }
}

struct InMemoryProcessor {
    state: Arc<QueueState>,
    task: Mutex<Option<JoinHandle<()>>>,
    shutdown: watch::Sender<bool>,
}

#[async_trait]
impl QueueProcessor for InMemoryProcessor {
    async fn start(
        &self,
        handler: Arc<dyn MessageHandler>,
        _error_handler: Arc<dyn TransportErrorHandler>,
    ) -> Result<(), QueueError> {
        let mut task = self
            .task
            .lock()
            .map_err(|_| QueueError::Other("processor lock poisoned".to_string()))?;
        if task.is_some() {
            return Err(QueueError::Other("processor already started".to_string()));
        }

        let state = self.state.clone();
        let mut shutdown = self.shutdown.subscribe();
        *task = Some(tokio::spawn(async move {
            loop {
                if *shutdown.borrow() {
                    break;
                }
                tokio::select! {
                    _ = shutdown.changed() => {}
                    message = state.pop() => {
                        if handler.handle(message.clone()).await == Disposition::Abandon {
                            state.push(message);
                        }
                    }
                }
            }
        }));
        Ok(())
    }

    async fn stop(&self) -> Result<(), QueueError> {
        let task = self
            .task
            .lock()
            .map_err(|_| QueueError::Other("processor lock poisoned".to_string()))?
            .take();
        if let Some(task) = task {
            let _ = self.shutdown.send(true);
            let _ = task.await;
        }
        Ok(())
    }
}
