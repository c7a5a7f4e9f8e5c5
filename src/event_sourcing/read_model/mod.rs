// ============================================================================
// Read Model - projected JSON documents
// ============================================================================
//
// Read-only access to the documents projectors build from the event stream.
//
// ============================================================================

pub mod document;
pub mod repository;

pub use document::JsonDocument;
pub use repository::{DocumentRepository, InMemoryDocumentRepository, RedisDocumentRepository};
