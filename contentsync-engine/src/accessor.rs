//! Content store boundary.
//!
//! The engine never owns content; it reads items, authors, terms, and meta
//! through this trait. Implementations wrap whatever the deployment's
//! content store is.

use crate::error::SyncResult;
use async_trait::async_trait;
use contentsync_types::{
    Author, ContentItem, ContentItemId, ContentType, TenantId, Term, UserId,
};
use std::collections::BTreeMap;

/// Read-only view over the content store.
#[async_trait]
pub trait ContentAccessor: Send + Sync {
    /// Fetches an item by id. `None` if it does not exist (or is already
    /// gone by the time a delete event is processed).
    async fn item(&self, id: ContentItemId) -> SyncResult<Option<ContentItem>>;

    /// Fetches the author record for a user. `None` when the user record is
    /// missing; callers fall back to [`Author::unknown`].
    async fn author(&self, user: UserId) -> SyncResult<Option<Author>>;

    /// Terms assigned to the item under one taxonomy, in the store's order.
    async fn assigned_terms(
        &self,
        item: ContentItemId,
        taxonomy: &str,
    ) -> SyncResult<Vec<Term>>;

    /// Names of the taxonomies registered for a content type.
    async fn taxonomies_for(&self, content_type: &ContentType) -> SyncResult<Vec<String>>;

    /// Raw metadata for an item: key to storage-encoded value. Protected
    /// keys are included here; the document builder filters them.
    async fn raw_meta(&self, item: ContentItemId) -> SyncResult<BTreeMap<String, String>>;

    /// Pages through a tenant's published items of the given types.
    ///
    /// The listing must be stably and deterministically ordered across
    /// calls: `offset` is reused as a resume point between invocations, so
    /// a listing that reorders (or has items inserted ahead of the offset)
    /// will skip or duplicate items. That limitation is inherent to
    /// offset-based resumption and is accepted here.
    async fn list_publishable(
        &self,
        tenant: TenantId,
        types: &[ContentType],
        offset: u64,
        limit: usize,
    ) -> SyncResult<Vec<ContentItem>>;

    /// All known tenant ids.
    async fn tenant_ids(&self) -> SyncResult<Vec<TenantId>>;

    /// Whether the current caller may edit the item. Authorization lives at
    /// the content-store boundary; the engine only consults the verdict.
    async fn can_edit(&self, item: ContentItemId) -> SyncResult<bool>;
}
