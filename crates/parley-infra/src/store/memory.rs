//! In-memory document store - used when no database is configured and in tests.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use parley_core::StoreError;
use parley_core::ports::{Direction, Document, DocumentSnapshot, DocumentStore};

use super::generate_document_id;

struct StoredDocument {
    data: Document,
    version: u64,
    /// Insertion sequence, the tie-breaker for ordered queries.
    seq: u64,
}

#[derive(Default)]
struct Collections {
    docs: HashMap<String, HashMap<String, StoredDocument>>,
    next_seq: u64,
}

impl Collections {
    fn doc_mut(&mut self, collection: &str, id: &str) -> Result<&mut StoredDocument, StoreError> {
        self.docs
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or(StoreError::NotFound)
    }
}

/// In-memory document store backed by a HashMap behind an async RwLock.
///
/// Every mutation takes the write lock for its whole duration, which gives
/// the same per-call atomicity a real document store provides server-side.
/// Data is lost on process restart.
pub struct InMemoryDocumentStore {
    inner: RwLock<Collections>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Collections::default()),
        }
    }

    /// Insert a document under a caller-chosen id, replacing any existing one.
    /// Handy for seeding records in shapes the service itself never writes.
    pub async fn insert_with_id(&self, collection: &str, id: &str, data: Document) {
        let mut inner = self.inner.write().await;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.docs.entry(collection.to_string()).or_default().insert(
            id.to_string(),
            StoredDocument {
                data,
                version: 1,
                seq,
            },
        );
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn merge(target: &mut Document, patch: Document) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

/// Cross-type ordering: missing/null < bool < number < string < array < object.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn new_id(&self) -> String {
        generate_document_id()
    }

    async fn add(&self, collection: &str, data: Document) -> Result<String, StoreError> {
        let id = self.new_id();
        self.insert_with_id(collection, &id, data).await;
        Ok(id)
    }

    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocumentSnapshot>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .docs
            .get(collection)
            .and_then(|c| c.get(id))
            .map(|doc| DocumentSnapshot {
                id: id.to_string(),
                data: doc.data.clone(),
                version: doc.version,
            }))
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let doc = inner.doc_mut(collection, id)?;
        merge(&mut doc.data, patch);
        doc.version += 1;
        Ok(())
    }

    async fn update_if_version(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
        expected_version: u64,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let doc = inner.doc_mut(collection, id)?;
        if doc.version != expected_version {
            return Err(StoreError::VersionMismatch {
                expected: expected_version,
                found: doc.version,
            });
        }
        merge(&mut doc.data, patch);
        doc.version += 1;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .docs
            .get_mut(collection)
            .and_then(|c| c.remove(id))
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        element: Value,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let doc = inner.doc_mut(collection, id)?;
        match doc.data.get_mut(field) {
            Some(Value::Array(items)) => {
                if !items.contains(&element) {
                    items.push(element);
                }
            }
            _ => {
                doc.data
                    .insert(field.to_string(), Value::Array(vec![element]));
            }
        }
        doc.version += 1;
        Ok(())
    }

    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        element: Value,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let doc = inner.doc_mut(collection, id)?;
        if let Some(Value::Array(items)) = doc.data.get_mut(field) {
            items.retain(|item| item != &element);
        }
        doc.version += 1;
        Ok(())
    }

    async fn query_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
    ) -> Result<Vec<DocumentSnapshot>, StoreError> {
        let inner = self.inner.read().await;
        let Some(docs) = inner.docs.get(collection) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<(&String, &StoredDocument)> = docs.iter().collect();
        rows.sort_by(|(_, a), (_, b)| {
            let by_field = compare_fields(a.data.get(field), b.data.get(field));
            let by_field = match direction {
                Direction::Ascending => by_field,
                Direction::Descending => by_field.reverse(),
            };
            by_field.then(a.seq.cmp(&b.seq))
        });

        Ok(rows
            .into_iter()
            .map(|(id, doc)| DocumentSnapshot {
                id: id.clone(),
                data: doc.data.clone(),
                version: doc.version,
            })
            .collect())
    }
}
