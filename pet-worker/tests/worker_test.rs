//! End-to-end worker test: events published to the in-memory queue drive the
//! pets collection through the real dispatcher and repositories.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use messaging::memory_queue::InMemoryQueue;
use messaging::publisher::QueuePublisher;
use messaging::receiver::QueueReceiver;
use pet_worker::build_dispatcher;
use petsim_core::events;
use storage::memory_store::InMemoryDocumentStore;
use storage::pet_repo::PetRepository;

const QUEUE: &str = "pets";

struct Harness {
    pets: Arc<PetRepository>,
    publisher: QueuePublisher,
    receiver: QueueReceiver,
}

async fn start_worker() -> Harness {
    let store = Arc::new(InMemoryDocumentStore::new());
    let pets = Arc::new(PetRepository::new(store));

    let queue = Arc::new(InMemoryQueue::new());
    let publisher = QueuePublisher::new(queue.as_ref(), QUEUE);
    let receiver = QueueReceiver::new(queue, build_dispatcher(pets.clone()));
    receiver
        .start_receiving(QUEUE, None)
        .await
        .expect("start receiving");

    Harness {
        pets,
        publisher,
        receiver,
    }
}

async fn wait_for_document(pets: &PetRepository, user_id: &str) {
    for _ in 0..500 {
        if pets.get_by_user_id(user_id, "tx-probe").await.success {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("pets document for {user_id} never appeared");
}

async fn wait_for_removal(pets: &PetRepository, user_id: &str) {
    for _ in 0..500 {
        if pets.get_by_user_id(user_id, "tx-probe").await.status_code == 404 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("pets document for {user_id} was never removed");
}

#[tokio::test]
async fn test_user_registration_creates_starter_pet() {
    let harness = start_worker().await;

    harness
        .publisher
        .send(
            events::USER_REGISTER,
            &json!({"userId": "u-1", "username": "alice", "email": "alice@example.com"}),
            "tx-reg",
        )
        .await
        .expect("publish");

    wait_for_document(&harness.pets, "u-1").await;

    let response = harness.pets.get_by_user_id("u-1", "tx-check").await;
    let entity = response.entity.expect("pets document");
    assert_eq!(entity.user_id, "u-1");
    assert_eq!(entity.pets.len(), 1);
    let pet = &entity.pets[0];
    assert!(pet.is_alive);
    assert_eq!(pet.health, 3);
    assert_eq!(pet.days_old, 0);
    assert!(!pet.pet_id.is_empty());

    harness.receiver.stop().await.expect("stop");
}

#[tokio::test]
async fn test_duplicate_registration_keeps_a_single_document() {
    let harness = start_worker().await;
    let event = json!({"userId": "u-1", "username": "alice", "email": "alice@example.com"});

    harness
        .publisher
        .send(events::USER_REGISTER, &event, "tx-1")
        .await
        .expect("first publish");
    harness
        .publisher
        .send(events::USER_REGISTER, &event, "tx-2")
        .await
        .expect("second publish");

    wait_for_document(&harness.pets, "u-1").await;
    // Let the second event drain too.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let all = harness
        .pets
        .documents()
        .get_all("tx-check")
        .await
        .entity
        .expect("document list");
    assert_eq!(all.len(), 1);

    harness.receiver.stop().await.expect("stop");
}

#[tokio::test]
async fn test_user_unregistration_removes_pets() {
    let harness = start_worker().await;

    harness
        .publisher
        .send(
            events::USER_REGISTER,
            &json!({"userId": "u-1", "username": "alice", "email": "alice@example.com"}),
            "tx-reg",
        )
        .await
        .expect("publish register");
    wait_for_document(&harness.pets, "u-1").await;

    harness
        .publisher
        .send(events::USER_UNREGISTER, &json!({"userId": "u-1"}), "tx-unreg")
        .await
        .expect("publish unregister");
    wait_for_removal(&harness.pets, "u-1").await;

    harness.receiver.stop().await.expect("stop");
}

#[tokio::test]
async fn test_unregistering_an_unknown_user_is_quietly_completed() {
    let harness = start_worker().await;

    harness
        .publisher
        .send(
            events::USER_UNREGISTER,
            &json!({"userId": "ghost"}),
            "tx-unreg",
        )
        .await
        .expect("publish");

    // The handler treats the missing document as already cleaned up; the
    // message must not bounce forever.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(harness.pets.documents().get_all("tx-check").await.success);

    harness.receiver.stop().await.expect("stop");
}
