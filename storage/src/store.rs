//! The document-store boundary.
//!
//! Repositories depend only on this narrow capability set: keyed
//! read/create/replace/delete over JSON documents plus a parameterized query
//! primitive returning one page at a time. Provider crates implement this
//! trait; [`crate::memory_store::InMemoryDocumentStore`] is the in-repo
//! implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

/// A parameterized query: raw query text plus named `@Param` values. The
/// text is passed verbatim to the store's query engine; parameters keep it
/// injection-safe.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub text: String,
    pub parameters: HashMap<String, Value>,
}

impl QuerySpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: HashMap::new(),
        }
    }

    /// The full-scan query used by `get_all`.
    pub fn all() -> Self {
        Self::new("SELECT * FROM c")
    }

    /// Adds a named parameter; `name` includes the `@` prefix.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// One page of query results. `continuation` is an opaque token; `None`
/// means the result set is exhausted.
#[derive(Debug)]
pub struct Page {
    pub documents: Vec<Value>,
    pub continuation: Option<String>,
}

/// Keyed document CRUD plus paginated query against one logical collection.
///
/// Implementations must be safe for concurrent use; the repository shares a
/// single handle across in-flight calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read(&self, id: &str, partition_key: &str) -> Result<Value, StoreError>;

    async fn create(
        &self,
        id: &str,
        partition_key: &str,
        document: Value,
    ) -> Result<Value, StoreError>;

    async fn replace(
        &self,
        id: &str,
        partition_key: &str,
        document: Value,
    ) -> Result<Value, StoreError>;

    async fn delete(&self, id: &str, partition_key: &str) -> Result<(), StoreError>;

    async fn query_page(
        &self,
        query: &QuerySpec,
        continuation: Option<&str>,
    ) -> Result<Page, StoreError>;
}
