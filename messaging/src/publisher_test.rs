//! Unit tests for the publisher retry policy.
//!
//! Timing assertions run under tokio's paused clock, so backoff delays are
//! observed without real waiting.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::error::{PublishError, QueueError};
use crate::message::QueueMessage;
use crate::publisher::QueuePublisher;
use crate::queue::QueueSender;

/// Replays a script of send outcomes; successful once the script runs out.
struct ScriptedSender {
    script: Mutex<VecDeque<Result<(), QueueError>>>,
    calls: AtomicU32,
}

impl ScriptedSender {
    fn new(script: Vec<Result<(), QueueError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueueSender for ScriptedSender {
    async fn send(&self, _message: QueueMessage) -> Result<(), QueueError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

#[tokio::test(start_paused = true)]
async fn test_transient_faults_are_retried_with_backoff() {
    let sender = ScriptedSender::new(vec![
        Err(QueueError::ServiceBusy),
        Err(QueueError::ServiceBusy),
        Ok(()),
    ]);
    let publisher = QueuePublisher::from_sender("pets", sender.clone());

    let started = tokio::time::Instant::now();
    let result = publisher
        .send("USER_REGISTER", &json!({"userId": "u-1"}), "tx-1")
        .await;

    assert!(result.is_ok());
    assert_eq!(sender.calls(), 3);
    // 2s after the first failure, 4s after the second.
    assert!(started.elapsed() >= std::time::Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_retry_budget_exhaustion_reports_attempt_count() {
    let sender = ScriptedSender::new(vec![
        Err(QueueError::ServiceBusy),
        Err(QueueError::QuotaExceeded),
        Err(QueueError::Timeout),
        Err(QueueError::Connection("socket reset".to_string())),
    ]);
    let publisher = QueuePublisher::from_sender("pets", sender.clone());

    let started = tokio::time::Instant::now();
    let result = publisher
        .send("USER_REGISTER", &json!({"userId": "u-1"}), "tx-1")
        .await;

    match result {
        Err(PublishError::RetriesExhausted { attempts, source }) => {
            assert_eq!(attempts, 4);
            assert_eq!(source, QueueError::Connection("socket reset".to_string()));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(sender.calls(), 4);
    // 2s + 4s + 8s of backoff before giving up.
    assert!(started.elapsed() >= std::time::Duration::from_secs(14));
}

#[tokio::test(start_paused = true)]
async fn test_permanent_fault_short_circuits_without_delay() {
    let sender = ScriptedSender::new(vec![Err(QueueError::EntityNotFound(
        "pets".to_string(),
    ))]);
    let publisher = QueuePublisher::from_sender("pets", sender.clone());

    let started = tokio::time::Instant::now();
    let result = publisher
        .send("USER_REGISTER", &json!({"userId": "u-1"}), "tx-1")
        .await;

    assert!(matches!(result, Err(PublishError::EntityNotFound(_))));
    assert_eq!(sender.calls(), 1);
    assert_eq!(started.elapsed(), std::time::Duration::ZERO);
}

#[tokio::test]
async fn test_unauthorized_is_surfaced_as_its_own_failure() {
    let sender = ScriptedSender::new(vec![Err(QueueError::Unauthorized(
        "bad credentials".to_string(),
    ))]);
    let publisher = QueuePublisher::from_sender("pets", sender.clone());

    let result = publisher
        .send("USER_REGISTER", &json!({"userId": "u-1"}), "tx-1")
        .await;

    assert!(matches!(result, Err(PublishError::Unauthorized(_))));
    assert_eq!(sender.calls(), 1);
}

#[tokio::test]
async fn test_serialization_failure_never_touches_the_transport() {
    struct Unserializable;

    impl serde::Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("broken payload"))
        }
    }

    let sender = ScriptedSender::new(vec![]);
    let publisher = QueuePublisher::from_sender("pets", sender.clone());

    let result = publisher.send("USER_REGISTER", &Unserializable, "tx-1").await;

    assert!(matches!(result, Err(PublishError::Serialization(_))));
    assert_eq!(sender.calls(), 0);
}
