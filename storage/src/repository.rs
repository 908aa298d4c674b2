//! Generic repository: typed CRUD and query execution over one document
//! collection, returning [`StoreResponse`] instead of raising on expected
//! failure modes.
//!
//! Fault classification order matters: rate-limit wins over every other
//! signal, then not-found, then conflict (create path only), then 500.
//! A throttled miss must classify as 429 so callers can apply uniform
//! backoff regardless of the operation that tripped it.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::entity::DocumentEntity;
use crate::error::StoreError;
use crate::response::StoreResponse;
use crate::store::{DocumentStore, QuerySpec};

/// Per-call settings. The store transport enforces its own limits; this
/// timeout bounds each call above whatever the transport does.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub request_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Typed CRUD/query engine over an injected [`DocumentStore`].
///
/// Stateless apart from the shared store handle; one instance can serve any
/// number of concurrent in-flight calls.
pub struct DocumentRepository<T> {
    store: Arc<dyn DocumentStore>,
    options: StoreOptions,
    _entity: PhantomData<fn() -> T>,
}

impl<T: DocumentEntity> DocumentRepository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_options(store, StoreOptions::default())
    }

    pub fn with_options(store: Arc<dyn DocumentStore>, options: StoreOptions) -> Self {
        Self {
            store,
            options,
            _entity: PhantomData,
        }
    }

    /// Fetches a single document. 200 on hit, 404 on miss, 429/500 on fault.
    pub async fn get_by_id(
        &self,
        id: &str,
        partition_key: &str,
        transaction_id: &str,
    ) -> StoreResponse<T> {
        match self.bounded(self.store.read(id, partition_key)).await {
            Ok(doc) => match decode::<T>(doc) {
                Ok(entity) => {
                    info!(transaction_id, "item {} found", id);
                    StoreResponse::ok(entity)
                }
                Err(e) => {
                    error!(transaction_id, "failed to decode item {}: {}", id, e);
                    StoreResponse::unexpected(e)
                }
            },
            Err(e) => classify(e, false, &format!("fetching item {id}"), transaction_id),
        }
    }

    /// Fetches every document in the collection, paginating to exhaustion.
    /// An empty collection is a 200 with an empty list, not an error.
    pub async fn get_all(&self, transaction_id: &str) -> StoreResponse<Vec<T>> {
        self.query(&QuerySpec::all(), transaction_id).await
    }

    /// Executes a parameterized query, accumulating pages sequentially until
    /// the store reports no continuation. Results keep the store's native
    /// order; no client-side sort.
    pub async fn query(&self, query: &QuerySpec, transaction_id: &str) -> StoreResponse<Vec<T>> {
        let mut results = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = match self
                .bounded(self.store.query_page(query, continuation.as_deref()))
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    return classify(e, false, &format!("executing query: {}", query.text), transaction_id)
                }
            };

            for doc in page.documents {
                match decode::<T>(doc) {
                    Ok(entity) => results.push(entity),
                    Err(e) => {
                        error!(transaction_id, "failed to decode query result: {}", e);
                        return StoreResponse::unexpected(e);
                    }
                }
            }

            match page.continuation {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        if results.is_empty() {
            info!(transaction_id, "no items found");
        } else {
            info!(transaction_id, "{} items found", results.len());
        }
        StoreResponse::ok(results)
    }

    /// Executes a query and returns the first result, or 404 when the result
    /// set is empty. When several documents match, "first" is whatever the
    /// store iterated first — the order is unspecified, so callers must not
    /// rely on it.
    pub async fn query_one(&self, query: &QuerySpec, transaction_id: &str) -> StoreResponse<T> {
        let response = self.query(query, transaction_id).await;
        if !response.success {
            return StoreResponse::failed(response.status_code, response.error);
        }

        let mut items = response.entity.unwrap_or_default();
        if items.is_empty() {
            StoreResponse::not_found()
        } else {
            StoreResponse::ok(items.remove(0))
        }
    }

    /// Inserts a new document. The repository assigns a fresh document id,
    /// overwriting any caller-supplied value. 201 with the stored entity on
    /// success, 409 on id collision.
    pub async fn add(&self, mut entity: T, transaction_id: &str) -> StoreResponse<T> {
        entity.set_document_id(petsim_core::id::generate_short_id());
        let id = entity.document_id().to_string();
        let partition_key = entity.partition_key().to_string();

        let doc = match encode(&entity) {
            Ok(doc) => doc,
            Err(e) => {
                error!(transaction_id, "failed to encode item for insert: {}", e);
                return StoreResponse::unexpected(e);
            }
        };

        match self
            .bounded(self.store.create(&id, &partition_key, doc))
            .await
        {
            Ok(stored) => match decode::<T>(stored) {
                Ok(entity) => {
                    info!(transaction_id, "item {} created", id);
                    StoreResponse::created(entity)
                }
                Err(e) => {
                    error!(transaction_id, "failed to decode created item {}: {}", id, e);
                    StoreResponse::unexpected(e)
                }
            },
            Err(e) => classify(e, true, &format!("adding item {id}"), transaction_id),
        }
    }

    /// Full replace keyed by id + partition key; not a partial patch.
    /// Callers merge partial updates before calling. 200 with the new
    /// entity, or 404 when the target does not exist.
    pub async fn update(
        &self,
        id: &str,
        partition_key: &str,
        entity: T,
        transaction_id: &str,
    ) -> StoreResponse<T> {
        let doc = match encode(&entity) {
            Ok(doc) => doc,
            Err(e) => {
                error!(transaction_id, "failed to encode item for update: {}", e);
                return StoreResponse::unexpected(e);
            }
        };

        match self
            .bounded(self.store.replace(id, partition_key, doc))
            .await
        {
            Ok(stored) => match decode::<T>(stored) {
                Ok(entity) => {
                    info!(transaction_id, "item {} updated", id);
                    StoreResponse::ok(entity)
                }
                Err(e) => {
                    error!(transaction_id, "failed to decode updated item {}: {}", id, e);
                    StoreResponse::unexpected(e)
                }
            },
            Err(e) => classify(e, false, &format!("updating item {id}"), transaction_id),
        }
    }

    /// Physical, idempotent delete. 204 when removed; deleting an absent id
    /// is a reported 404, never a panic or raised error.
    pub async fn delete(
        &self,
        id: &str,
        partition_key: &str,
        transaction_id: &str,
    ) -> StoreResponse<T> {
        match self.bounded(self.store.delete(id, partition_key)).await {
            Ok(()) => {
                info!(transaction_id, "item {} deleted", id);
                StoreResponse::deleted()
            }
            Err(e) => classify(e, false, &format!("deleting item {id}"), transaction_id),
        }
    }

    async fn bounded<F, O>(&self, call: F) -> Result<O, StoreError>
    where
        F: Future<Output = Result<O, StoreError>>,
    {
        match tokio::time::timeout(self.options.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout),
        }
    }
}

/// Translates a store fault into a response, checking signals in priority
/// order. Conflict only applies on the create path; elsewhere an id
/// collision signal is unexpected and falls through to 500.
fn classify<T>(
    error: StoreError,
    create_path: bool,
    context: &str,
    transaction_id: &str,
) -> StoreResponse<T> {
    if error.is_rate_limited() {
        warn!(transaction_id, "store throttled request while {}", context);
        StoreResponse::rate_limited(error)
    } else if error.is_not_found() {
        info!(transaction_id, "item not found while {}", context);
        StoreResponse::not_found()
    } else if create_path && error.is_conflict() {
        warn!(transaction_id, "item already exists while {}", context);
        StoreResponse::conflict(error)
    } else {
        error!(transaction_id, "error while {}: {}", context, error);
        StoreResponse::unexpected(error)
    }
}

fn encode<T: DocumentEntity>(entity: &T) -> Result<Value, StoreError> {
    serde_json::to_value(entity)
        .map_err(|e| StoreError::provider(format!("failed to encode document: {e}")))
}

fn decode<T: DocumentEntity>(doc: Value) -> Result<T, StoreError> {
    serde_json::from_value(doc)
        .map_err(|e| StoreError::provider(format!("failed to decode document: {e}")))
}
