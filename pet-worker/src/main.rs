use std::sync::Arc;

use tracing::info;

use messaging::memory_queue::InMemoryQueue;
use messaging::receiver::QueueReceiver;
use pet_worker::{build_dispatcher, WorkerConfig};
use storage::memory_store::InMemoryDocumentStore;
use storage::pet_repo::PetRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = WorkerConfig::from_env();
    petsim_core::logger::init_tracing(config.log_file.as_deref())?;

    info!("starting pet worker on queue '{}'", config.queue_name);

    let store = Arc::new(InMemoryDocumentStore::new());
    let pets = Arc::new(PetRepository::new(store));

    let queue = Arc::new(InMemoryQueue::new());
    let receiver = QueueReceiver::new(queue, build_dispatcher(pets));
    receiver
        .start_receiving(&config.queue_name, config.subscription.as_deref())
        .await?;

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received, stopping receiver");
    receiver.stop().await?;

    Ok(())
}
