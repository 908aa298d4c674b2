//! Background worker consuming user-lifecycle events and keeping the pets
//! collection in sync.

pub mod config;
pub mod handlers;

use std::sync::Arc;

use messaging::receiver::EventDispatcher;
use petsim_core::events;
use storage::pet_repo::PetRepository;

pub use config::WorkerConfig;

/// Wires every event handler the worker serves to its message type.
pub fn build_dispatcher(pets: Arc<PetRepository>) -> EventDispatcher {
    EventDispatcher::new()
        .register(
            events::USER_REGISTER,
            Arc::new(handlers::UserRegisteredHandler::new(pets.clone())),
        )
        .register(
            events::USER_UNREGISTER,
            Arc::new(handlers::UserUnregisteredHandler::new(pets)),
        )
}
