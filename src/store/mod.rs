//! Document store abstraction.
//!
//! The portal talks to its database through the [`DocumentStore`] trait. Each
//! method maps to exactly one driver call against one collection, so the
//! HTTP layer stays a thin pass-through.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             PortalService               │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          DocumentStore trait            │
//! │  insert / find_all / find_by_field /    │
//! │  find_by_id / delete_by_id / ping       │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              MongoStore                 │
//! │   (driver-managed connection pool)      │
//! └─────────────────────────────────────────┘
//! ```

mod document;
mod mongo;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

pub use document::{document_from_json, document_to_json, parse_object_id};
pub use mongo::{MongoStore, DEFAULT_DATABASE};

// =============================================================================
// Collections
// =============================================================================

/// The two collections backing the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Jobs,
    JobApplications,
}

impl Collection {
    /// Collection name in the database.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Jobs => "jobs",
            Collection::JobApplications => "jobApplications",
        }
    }

    pub fn all() -> [Collection; 2] {
        [Collection::Jobs, Collection::JobApplications]
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Acknowledgments
// =============================================================================

/// Summary of a single-document insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,

    /// Generated identifier, rendered the same way documents render `_id`
    pub inserted_id: Value,
}

/// Summary of a single-document delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

// =============================================================================
// DocumentStore Trait
// =============================================================================

/// One-shot operations against a document collection.
///
/// Implementations must be cheap to share across requests; the portal wraps
/// the store in an `Arc` and never synchronizes calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, generating an `_id` when the payload has none.
    async fn insert(&self, collection: Collection, document: Document)
        -> Result<InsertAck, StoreError>;

    /// Return every document in the collection.
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError>;

    /// Return every document whose `field` equals the given string.
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError>;

    /// Return the document with the given `_id`, if any.
    async fn find_by_id(
        &self,
        collection: Collection,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError>;

    /// Delete the document with the given `_id`.
    async fn delete_by_id(&self, collection: Collection, id: &ObjectId)
        -> Result<DeleteAck, StoreError>;

    /// Round-trip to the database to confirm it is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
