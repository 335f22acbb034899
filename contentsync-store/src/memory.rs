//! In-memory state store — the reference implementation.

use crate::{StateStoreResult, SyncStateStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contentsync_types::{ContentItemId, SyncCursor, TenantId};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct DocumentRecord {
    document_id: Option<String>,
    synced_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Inner {
    cursors: HashMap<TenantId, SyncCursor>,
    markers: HashSet<(ContentItemId, TenantId)>,
    documents: HashMap<(ContentItemId, TenantId), DocumentRecord>,
}

/// In-memory [`SyncStateStore`]. State lives behind a single mutex, which
/// also makes `mark` a true compare-and-set.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    inner: Mutex<Inner>,
}

impl MemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SyncStateStore for MemoryStateStore {
    async fn cursor(&self, tenant: TenantId) -> StateStoreResult<SyncCursor> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.cursors.get(&tenant).cloned().unwrap_or_default())
    }

    async fn put_cursor(&self, tenant: TenantId, cursor: &SyncCursor) -> StateStoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.cursors.insert(tenant, cursor.clone());
        Ok(())
    }

    async fn reset_cursor(&self, tenant: TenantId) -> StateStoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.cursors.insert(tenant, SyncCursor::default());
        Ok(())
    }

    async fn is_marked(&self, item: ContentItemId, tenant: TenantId) -> StateStoreResult<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.markers.contains(&(item, tenant)))
    }

    async fn mark(&self, item: ContentItemId, tenant: TenantId) -> StateStoreResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.markers.insert((item, tenant)))
    }

    async fn document_id(
        &self,
        item: ContentItemId,
        tenant: TenantId,
    ) -> StateStoreResult<Option<String>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .documents
            .get(&(item, tenant))
            .and_then(|r| r.document_id.clone()))
    }

    async fn put_document_id(
        &self,
        item: ContentItemId,
        tenant: TenantId,
        document_id: &str,
    ) -> StateStoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .documents
            .entry((item, tenant))
            .or_default()
            .document_id = Some(document_id.to_string());
        Ok(())
    }

    async fn record_synced_at(
        &self,
        item: ContentItemId,
        tenant: TenantId,
        at: DateTime<Utc>,
    ) -> StateStoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.documents.entry((item, tenant)).or_default().synced_at = Some(at);
        Ok(())
    }

    async fn synced_at(
        &self,
        item: ContentItemId,
        tenant: TenantId,
    ) -> StateStoreResult<Option<DateTime<Utc>>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.documents.get(&(item, tenant)).and_then(|r| r.synced_at))
    }
}
