//! Search index boundary.

use crate::error::SyncResult;
use async_trait::async_trait;
use contentsync_types::{IndexDocument, TenantId};

/// Receipt returned by a successful index write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReceipt {
    /// The index's id for the document.
    pub document_id: String,
}

/// Client for the search index backend.
///
/// `target` selects the physical index: `Some(tenant)` for that tenant's
/// index (the global tenant names the shared cross-tenant index), `None`
/// for the caller's local default. An empty response (`Ok(None)` /
/// `Ok(false)`) means the backend did not accept the write; the engine
/// treats that as a non-fatal failure and mutates nothing.
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Indexes a document (idempotent upsert). Returns the receipt, or
    /// `None` for an empty response.
    async fn index_document(
        &self,
        document: &IndexDocument,
        target: Option<TenantId>,
    ) -> SyncResult<Option<IndexReceipt>>;

    /// Deletes a document by its index id. Returns whether the backend
    /// acknowledged the delete.
    async fn delete_document(
        &self,
        document_id: &str,
        target: Option<TenantId>,
    ) -> SyncResult<bool>;
}
