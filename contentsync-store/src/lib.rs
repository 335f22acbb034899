//! Sync state persistence for contentsync.
//!
//! The sync engine keeps three kinds of durable facts, all keyed by tenant
//! (and item, where it applies):
//! - **Cursors**: per-tenant bulk-sync progress (`start_time` + offset)
//! - **Markers**: "this item already has an index document" facts
//! - **Document ids**: the index's id for an item, plus a last-synced stamp
//!
//! The [`SyncStateStore`] trait is the boundary the engine talks to; any
//! backend that can hold these facts qualifies. Two implementations ship
//! here: [`MemoryStateStore`] (the reference, also used by tests) and
//! [`SqliteStateStore`] (durable, single-file).
//!
//! Marker writes are the one place concurrent event-triggered and
//! bulk-triggered syncs can race, so [`SyncStateStore::mark`] is specified
//! as a compare-and-set: it returns whether this call newly set the marker,
//! and implementations must make that decision atomically.

mod error;
mod memory;
mod sqlite;

pub use error::{StateStoreError, StateStoreResult};
pub use memory::MemoryStateStore;
pub use sqlite::SqliteStateStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contentsync_types::{ContentItemId, SyncCursor, TenantId};

/// Persistence boundary for sync state (cursors, markers, document ids).
///
/// All operations are keyed by tenant; callers resolve any "current/default
/// tenant" shorthand before reaching the store.
#[async_trait]
pub trait SyncStateStore: Send + Sync {
    /// Loads the tenant's bulk-sync cursor. A tenant with no stored cursor
    /// gets the default (unscheduled, offset zero).
    async fn cursor(&self, tenant: TenantId) -> StateStoreResult<SyncCursor>;

    /// Persists the tenant's bulk-sync cursor.
    async fn put_cursor(&self, tenant: TenantId, cursor: &SyncCursor) -> StateStoreResult<()>;

    /// Resets the tenant's cursor to unscheduled/zero.
    async fn reset_cursor(&self, tenant: TenantId) -> StateStoreResult<()>;

    /// Whether the item already has an index document for this tenant.
    async fn is_marked(&self, item: ContentItemId, tenant: TenantId) -> StateStoreResult<bool>;

    /// Sets the marker for (item, tenant). Returns `true` iff this call
    /// newly set it (compare-and-set; atomic per implementation).
    async fn mark(&self, item: ContentItemId, tenant: TenantId) -> StateStoreResult<bool>;

    /// The index's document id for (item, tenant), if one was recorded.
    async fn document_id(
        &self,
        item: ContentItemId,
        tenant: TenantId,
    ) -> StateStoreResult<Option<String>>;

    /// Records the index's document id for (item, tenant).
    async fn put_document_id(
        &self,
        item: ContentItemId,
        tenant: TenantId,
        document_id: &str,
    ) -> StateStoreResult<()>;

    /// Records when (item, tenant) last synced successfully.
    async fn record_synced_at(
        &self,
        item: ContentItemId,
        tenant: TenantId,
        at: DateTime<Utc>,
    ) -> StateStoreResult<()>;

    /// When (item, tenant) last synced successfully, if ever.
    async fn synced_at(
        &self,
        item: ContentItemId,
        tenant: TenantId,
    ) -> StateStoreResult<Option<DateTime<Utc>>>;
}
