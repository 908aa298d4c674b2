//! Unit tests for the receiver and dispatcher over the in-memory transport.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::HandlerError;
use crate::memory_queue::InMemoryQueue;
use crate::publisher::QueuePublisher;
use crate::queue::QueueClient;
use crate::receiver::{EventDispatcher, EventHandler, QueueReceiver};

/// Records every payload and transaction id it sees.
#[derive(Default)]
struct RecordingHandler {
    seen: Mutex<Vec<(Value, String)>>,
}

impl RecordingHandler {
    fn seen(&self) -> Vec<(Value, String)> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, payload: &Value, transaction_id: &str) -> Result<(), HandlerError> {
        self.seen
            .lock()
            .expect("seen lock")
            .push((payload.clone(), transaction_id.to_string()));
        Ok(())
    }
}

/// Fails the first `failures` calls, then succeeds.
struct FlakyHandler {
    failures: u32,
    calls: AtomicU32,
}

#[async_trait]
impl EventHandler for FlakyHandler {
    async fn handle(&self, _payload: &Value, _transaction_id: &str) -> Result<(), HandlerError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(HandlerError::Failed("not yet".to_string()))
        } else {
            Ok(())
        }
    }
}

async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn test_dispatches_by_message_type_and_completes() {
    let queue = Arc::new(InMemoryQueue::new());
    let handler = Arc::new(RecordingHandler::default());
    let dispatcher = EventDispatcher::new().register("USER_REGISTER", handler.clone());
    let receiver = QueueReceiver::new(queue.clone(), dispatcher);

    receiver
        .start_receiving("pets", None)
        .await
        .expect("start receiving");

    let publisher = QueuePublisher::new(queue.as_ref(), "pets");
    publisher
        .send("USER_REGISTER", &json!({"userId": "u-1"}), "tx-42")
        .await
        .expect("publish");

    wait_for(|| !handler.seen().is_empty()).await;
    let seen = handler.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0["userId"], "u-1");
    assert_eq!(seen[0].1, "tx-42");
    assert_eq!(queue.pending("pets"), 0);

    receiver.stop().await.expect("stop");
}

#[tokio::test]
async fn test_unknown_message_type_is_completed_not_redelivered() {
    let queue = Arc::new(InMemoryQueue::new());
    let receiver = QueueReceiver::new(queue.clone(), EventDispatcher::new());

    receiver
        .start_receiving("pets", None)
        .await
        .expect("start receiving");

    let publisher = QueuePublisher::new(queue.as_ref(), "pets");
    publisher
        .send("MYSTERY_TYPE", &json!({}), "tx-1")
        .await
        .expect("publish");

    wait_for(|| queue.pending("pets") == 0).await;
    // Give the loop a chance to (wrongly) requeue it.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(queue.pending("pets"), 0);

    receiver.stop().await.expect("stop");
}

#[tokio::test]
async fn test_failed_handling_leaves_message_for_redelivery() {
    let queue = Arc::new(InMemoryQueue::new());
    let handler = Arc::new(FlakyHandler {
        failures: 1,
        calls: AtomicU32::new(0),
    });
    let dispatcher = EventDispatcher::new().register("USER_REGISTER", handler.clone());
    let receiver = QueueReceiver::new(queue.clone(), dispatcher);

    receiver
        .start_receiving("pets", None)
        .await
        .expect("start receiving");

    let publisher = QueuePublisher::new(queue.as_ref(), "pets");
    publisher
        .send("USER_REGISTER", &json!({"userId": "u-1"}), "tx-1")
        .await
        .expect("publish");

    // First delivery fails and is requeued; the second succeeds.
    wait_for(|| handler.calls.load(Ordering::SeqCst) >= 2).await;
    wait_for(|| queue.pending("pets") == 0).await;

    receiver.stop().await.expect("stop");
}

#[tokio::test]
async fn test_start_receiving_is_idempotent() {
    let queue = Arc::new(InMemoryQueue::new());
    let handler = Arc::new(RecordingHandler::default());
    let dispatcher = EventDispatcher::new().register("USER_REGISTER", handler.clone());
    let receiver = QueueReceiver::new(queue.clone(), dispatcher);

    receiver
        .start_receiving("pets", None)
        .await
        .expect("first start");
    receiver
        .start_receiving("pets", None)
        .await
        .expect("second start is a logged no-op");

    let publisher = QueuePublisher::new(queue.as_ref(), "pets");
    publisher
        .send("USER_REGISTER", &json!({"userId": "u-1"}), "tx-1")
        .await
        .expect("publish");

    wait_for(|| !handler.seen().is_empty()).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(handler.seen().len(), 1);

    receiver.stop().await.expect("stop");
}

#[tokio::test]
async fn test_malformed_body_is_discarded() {
    let queue = Arc::new(InMemoryQueue::new());
    let handler = Arc::new(RecordingHandler::default());
    let dispatcher = EventDispatcher::new().register("USER_REGISTER", handler.clone());
    let receiver = QueueReceiver::new(queue.clone(), dispatcher);

    receiver
        .start_receiving("pets", None)
        .await
        .expect("start receiving");

    let sender = queue.create_sender("pets");
    sender
        .send(crate::message::QueueMessage::new(
            "USER_REGISTER",
            b"not json at all".to_vec(),
            "tx-1",
        ))
        .await
        .expect("raw send");

    wait_for(|| queue.pending("pets") == 0).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(handler.seen().is_empty());

    receiver.stop().await.expect("stop");
}
