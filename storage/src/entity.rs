//! Trait implemented by every stored record type.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record that can live in a document collection.
///
/// The repository assigns the document id on create; callers never pick one.
pub trait DocumentEntity: Serialize + DeserializeOwned + Clone + Send + Sync {
    fn document_id(&self) -> &str;

    fn set_document_id(&mut self, id: String);

    /// Partition key for routing. This domain uses single-item partitions,
    /// so it defaults to the document id.
    fn partition_key(&self) -> &str {
        self.document_id()
    }
}
