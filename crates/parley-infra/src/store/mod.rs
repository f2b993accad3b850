//! Document store implementations.

mod memory;

pub use memory::InMemoryDocumentStore;

/// Random 32-character hex id; never derived from document content.
pub fn generate_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
