//! Document store port - schema-flexible JSON documents grouped in collections.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// A document body: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A document as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub id: String,
    pub data: Document,
    /// Incremented by the store on every successful write to the document.
    pub version: u64,
}

/// Document store trait - abstraction over document backends.
///
/// Every method is a single round trip and is applied atomically by the
/// backend. `array_union` and `array_remove` in particular must not be
/// emulated client-side: they exist so concurrent writers never lose each
/// other's elements.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Generate a fresh unique id without writing anything.
    fn new_id(&self) -> String;

    /// Insert a new document under a generated id and return that id.
    async fn add(&self, collection: &str, data: Document) -> Result<String, StoreError>;

    /// Fetch a document, `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str)
    -> Result<Option<DocumentSnapshot>, StoreError>;

    /// Merge top-level fields into an existing document.
    /// Fails with [`StoreError::NotFound`] if the document is absent.
    async fn update(&self, collection: &str, id: &str, patch: Document)
    -> Result<(), StoreError>;

    /// Like [`DocumentStore::update`], but only if the stored version still
    /// equals `expected_version`; otherwise [`StoreError::VersionMismatch`].
    async fn update_if_version(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
        expected_version: u64,
    ) -> Result<(), StoreError>;

    /// Delete a document. Fails with [`StoreError::NotFound`] if absent.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Append `element` to the array at `field` unless an equal element is
    /// already present. A missing or non-array field becomes `[element]`.
    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        element: Value,
    ) -> Result<(), StoreError>;

    /// Remove every element equal to `element` from the array at `field`.
    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        element: Value,
    ) -> Result<(), StoreError>;

    /// All documents of a collection ordered by a top-level field.
    /// Documents lacking the field sort after all others when descending.
    async fn query_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
    ) -> Result<Vec<DocumentSnapshot>, StoreError>;
}
