//! User lookups by secondary fields.
//!
//! Thin composition atop the generic query primitive: each lookup builds a
//! `QuerySpec` and passes the response straight through, so status-code
//! semantics have a single source of truth in [`DocumentRepository`].

use std::sync::Arc;

use crate::models::UserEntity;
use crate::repository::{DocumentRepository, StoreOptions};
use crate::response::StoreResponse;
use crate::store::{DocumentStore, QuerySpec};

pub struct UserRepository {
    inner: DocumentRepository<UserEntity>,
}

impl UserRepository {
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

    /// The generic CRUD surface for user documents.
    pub fn documents(&self) -> &DocumentRepository<UserEntity> {
        &self.inner
    }

    pub async fn get_by_email(
        &self,
        email: &str,
        transaction_id: &str,
    ) -> StoreResponse<UserEntity> {
        let query =
            QuerySpec::new("SELECT * FROM c WHERE c.email = @Email").with_param("@Email", email);
        self.inner.query_one(&query, transaction_id).await
    }

    pub async fn get_by_username(
        &self,
        username: &str,
        transaction_id: &str,
    ) -> StoreResponse<UserEntity> {
        let query = QuerySpec::new("SELECT * FROM c WHERE c.username = @Username")
            .with_param("@Username", username);
        self.inner.query_one(&query, transaction_id).await
    }
}
