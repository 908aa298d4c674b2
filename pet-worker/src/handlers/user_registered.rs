//! Creates the pets document for a newly registered user.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, warn};

use messaging::error::HandlerError;
use messaging::receiver::EventHandler;
use petsim_core::events::UserRegisteredEvent;
use storage::models::{PetRecord, UserPetsEntity};
use storage::pet_repo::PetRepository;

/// Handles `USER_REGISTER`: every new user gets a pets document seeded with
/// one starter pet. Re-delivery of the same event must not create a second
/// document, so an existing document for the user is treated as done.
pub struct UserRegisteredHandler {
    pets: Arc<PetRepository>,
}

impl UserRegisteredHandler {
    pub fn new(pets: Arc<PetRepository>) -> Self {
        Self { pets }
    }
}

#[async_trait]
impl EventHandler for UserRegisteredHandler {
    async fn handle(&self, payload: &Value, transaction_id: &str) -> Result<(), HandlerError> {
        let event: UserRegisteredEvent = serde_json::from_value(payload.clone())?;
        info!(
            transaction_id,
            "registering pets for user {}", event.user_id
        );

        let existing = self.pets.get_by_user_id(&event.user_id, transaction_id).await;
        if existing.success {
            warn!(
                transaction_id,
                "pets document already exists for user {}; skipping", event.user_id
            );
            return Ok(());
        }
        if existing.status_code != 404 {
            error!(
                transaction_id,
                "could not check pets for user {}: status {}",
                event.user_id,
                existing.status_code
            );
            return Err(HandlerError::Failed(format!(
                "pets lookup for user {} failed with status {}",
                event.user_id, existing.status_code
            )));
        }

        let starter = PetRecord::new("Bibi", "dog", "brown");
        let entity = UserPetsEntity::for_user(&event.user_id, vec![starter]);
        let created = self.pets.documents().add(entity, transaction_id).await;
        if !created.success {
            return Err(HandlerError::Failed(format!(
                "creating pets document for user {} failed with status {}",
                event.user_id, created.status_code
            )));
        }

        info!(
            transaction_id,
            "created pets document for user {}", event.user_id
        );
        Ok(())
    }
}
