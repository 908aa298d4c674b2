//! Pet-record lookups keyed by owning user.

use std::sync::Arc;

use tracing::warn;

use crate::entity::DocumentEntity;
use crate::models::UserPetsEntity;
use crate::repository::{DocumentRepository, StoreOptions};
use crate::response::StoreResponse;
use crate::store::{DocumentStore, QuerySpec};

pub struct PetRepository {
    inner: DocumentRepository<UserPetsEntity>,
}

impl PetRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: DocumentRepository::new(store),
        }
    }

    pub fn with_options(store: Arc<dyn DocumentStore>, options: StoreOptions) -> Self {
        Self {
            inner: DocumentRepository::with_options(store, options),
        }
    }

    /// The generic CRUD surface for pet documents.
    pub fn documents(&self) -> &DocumentRepository<UserPetsEntity> {
        &self.inner
    }

    pub async fn get_by_user_id(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> StoreResponse<UserPetsEntity> {
        let query = QuerySpec::new("SELECT * FROM c WHERE c.userId = @UserId")
            .with_param("@UserId", user_id);
        self.inner.query_one(&query, transaction_id).await
    }

    /// Removes the pets document for a user: look it up by user id, then
    /// delete it by its own key. A missing document reports 404.
    pub async fn delete_by_user_id(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> StoreResponse<UserPetsEntity> {
        let found = self.get_by_user_id(user_id, transaction_id).await;
        let entity = match found.entity {
            Some(entity) => entity,
            None => {
                if found.status_code == 404 {
                    warn!(transaction_id, "no pets found for user {}", user_id);
                }
                return StoreResponse::failed(found.status_code, found.error);
            }
        };

        let id = entity.document_id().to_string();
        let partition_key = entity.partition_key().to_string();
        self.inner.delete(&id, &partition_key, transaction_id).await
    }
}
