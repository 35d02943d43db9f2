//! Document repository abstraction
//!
//! The trait the CLI programs against. [`CouchRepository`] talks to a real
//! CouchDB server; [`InMemoryRepository`] keeps documents in process with
//! the same revision rules, for dry runs and tests.
//!
//! [`CouchRepository`]: crate::adapters::couchdb::CouchRepository
//! [`InMemoryRepository`]: crate::adapters::database::InMemoryRepository

use crate::core::OperationContext;
use crate::domain::{DocumentId, PharmaDetails, ResponseEnvelope, Revision, UpdatePharmaDetails};
use async_trait::async_trait;
use std::fmt;

/// The four document-store operations, used in logs and fault mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Create,
    Read,
    Update,
    Delete,
}

impl StoreOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreOperation::Create => "create",
            StoreOperation::Read => "read",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
        }
    }

    /// Operations that carry a revision and can hit a concurrency conflict
    pub fn is_revisioned(self) -> bool {
        matches!(self, StoreOperation::Update | StoreOperation::Delete)
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create/read/update/delete against a document store
///
/// Every method issues at most one request and never retries. Failures of
/// any kind come back as a failure [`ResponseEnvelope`]; implementations do
/// not return errors or panic on store faults.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Store a new batch record
    ///
    /// On success the envelope holds the store's response body, which
    /// carries the assigned `id` and `rev`.
    async fn create_document(&self, ctx: &OperationContext, doc: &PharmaDetails)
        -> ResponseEnvelope;

    /// Fetch a batch record by id
    ///
    /// A missing document is a failure envelope, not an empty success.
    async fn get_document(&self, ctx: &OperationContext, id: &DocumentId) -> ResponseEnvelope;

    /// Replace the mutable fields of a batch record
    ///
    /// Fails with a concurrency conflict if `update.rev` is not the
    /// document's current revision; the stored document is left unchanged.
    async fn update_document(
        &self,
        ctx: &OperationContext,
        update: &UpdatePharmaDetails,
    ) -> ResponseEnvelope;

    /// Delete a batch record at a known revision
    async fn delete_document(
        &self,
        ctx: &OperationContext,
        id: &DocumentId,
        rev: &Revision,
    ) -> ResponseEnvelope;

    /// Short description of the backend, for logs
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revisioned_operations() {
        assert!(!StoreOperation::Create.is_revisioned());
        assert!(!StoreOperation::Read.is_revisioned());
        assert!(StoreOperation::Update.is_revisioned());
        assert!(StoreOperation::Delete.is_revisioned());
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(StoreOperation::Delete.to_string(), "delete");
    }
}
