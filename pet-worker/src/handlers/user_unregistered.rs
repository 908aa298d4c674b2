//! Removes the pets document when a user unregisters.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use messaging::error::HandlerError;
use messaging::receiver::EventHandler;
use petsim_core::events::UserUnregisteredEvent;
use storage::pet_repo::PetRepository;

/// Handles `USER_UNREGISTER`. A user with no pets document counts as
/// already cleaned up, so a 404 from the delete succeeds.
pub struct UserUnregisteredHandler {
    pets: Arc<PetRepository>,
}

impl UserUnregisteredHandler {
    pub fn new(pets: Arc<PetRepository>) -> Self {
        Self { pets }
    }
}

#[async_trait]
impl EventHandler for UserUnregisteredHandler {
    async fn handle(&self, payload: &Value, transaction_id: &str) -> Result<(), HandlerError> {
        let event: UserUnregisteredEvent = serde_json::from_value(payload.clone())?;
        info!(
            transaction_id,
            "removing pets for user {}", event.user_id
        );

        let deleted = self
            .pets
            .delete_by_user_id(&event.user_id, transaction_id)
            .await;
        match deleted.status_code {
            204 => {
                info!(
                    transaction_id,
                    "deleted pets document for user {}", event.user_id
                );
                Ok(())
            }
            404 => {
                warn!(
                    transaction_id,
                    "no pets document for user {}; nothing to delete", event.user_id
                );
                Ok(())
            }
            status => Err(HandlerError::Failed(format!(
                "deleting pets document for user {} failed with status {}",
                event.user_id, status
            ))),
        }
    }
}
