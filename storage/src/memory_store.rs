//! In-memory [`DocumentStore`] implementation.
//!
//! Backs unit tests, the worker's local transport mode, and any embedding of
//! the storage crate without a hosted provider. Documents live in an ordered
//! map, so scans return them in id order — the "store native order" the
//! repository promises nothing about.
//!
//! The query engine supports the subset the repositories actually issue:
//! `SELECT * FROM c` optionally followed by `WHERE c.field = @Param`
//! clauses joined with `AND`. Anything else is an unsupported-query fault.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::store::{DocumentStore, Page, QuerySpec};

const DEFAULT_PAGE_SIZE: usize = 100;

pub struct InMemoryDocumentStore {
    documents: Mutex<BTreeMap<(String, String), Value>>,
    page_size: usize,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// A store that returns at most `page_size` documents per query page.
    /// Tests use small sizes to force multi-page iteration.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            documents: Mutex::new(BTreeMap::new()),
            page_size: page_size.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn guard(&self) -> Result<MutexGuard<'_, BTreeMap<(String, String), Value>>, StoreError> {
        self.documents
            .lock()
            .map_err(|_| StoreError::provider("store lock poisoned"))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn read(&self, id: &str, partition_key: &str) -> Result<Value, StoreError> {
        let documents = self.guard()?;
        documents
            .get(&(id.to_string(), partition_key.to_string()))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(
        &self,
        id: &str,
        partition_key: &str,
        document: Value,
    ) -> Result<Value, StoreError> {
        let mut documents = self.guard()?;
        let key = (id.to_string(), partition_key.to_string());
        if documents.contains_key(&key) {
            return Err(StoreError::Conflict);
        }
        documents.insert(key, document.clone());
        Ok(document)
    }

    async fn replace(
        &self,
        id: &str,
        partition_key: &str,
        document: Value,
    ) -> Result<Value, StoreError> {
        let mut documents = self.guard()?;
        let key = (id.to_string(), partition_key.to_string());
        if !documents.contains_key(&key) {
            return Err(StoreError::NotFound);
        }
        documents.insert(key, document.clone());
        Ok(document)
    }

    async fn delete(&self, id: &str, partition_key: &str) -> Result<(), StoreError> {
        let mut documents = self.guard()?;
        documents
            .remove(&(id.to_string(), partition_key.to_string()))
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn query_page(
        &self,
        query: &QuerySpec,
        continuation: Option<&str>,
    ) -> Result<Page, StoreError> {
        let filters = parse_filters(&query.text)?;

        let mut conditions = Vec::with_capacity(filters.len());
        for (field, param) in filters {
            let value = query.parameters.get(&param).ok_or_else(|| {
                StoreError::provider(format!("missing query parameter {param}"))
            })?;
            conditions.push((field, value.clone()));
        }

        let offset = match continuation {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| StoreError::provider(format!("bad continuation token {token}")))?,
            None => 0,
        };

        let documents = self.guard()?;
        let matching: Vec<Value> = documents
            .values()
            .filter(|doc| {
                conditions
                    .iter()
                    .all(|(field, value)| doc.get(field) == Some(value))
            })
            .cloned()
            .collect();
        drop(documents);

        let page: Vec<Value> = matching
            .iter()
            .skip(offset)
            .take(self.page_size)
            .cloned()
            .collect();
        let next = offset + page.len();
        let continuation = if next < matching.len() {
            Some(next.to_string())
        } else {
            None
        };

        Ok(Page {
            documents: page,
            continuation,
        })
    }
}

/// Parses the supported query subset into `(field, @param)` pairs; an empty
/// list means a full scan.
fn parse_filters(text: &str) -> Result<Vec<(String, String)>, StoreError> {
    let unsupported = || StoreError::provider(format!("unsupported query: {text}"));

    let rest = text.trim().strip_prefix("SELECT * FROM c").ok_or_else(unsupported)?;
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(Vec::new());
    }

    let rest = rest.strip_prefix("WHERE ").ok_or_else(unsupported)?;
    rest.split(" AND ")
        .map(|clause| {
            let (field, param) = clause.split_once('=').ok_or_else(unsupported)?;
            let field = field.trim().strip_prefix("c.").ok_or_else(unsupported)?;
            let param = param.trim();
            if !param.starts_with('@') || field.is_empty() {
                return Err(unsupported());
            }
            Ok((field.to_string(), param.to_string()))
        })
        .collect()
}
