//! Event gateway — the adapter the content store's notification mechanism
//! calls into.
//!
//! Lifecycle events (publish, delete) are fire-and-forget from the caller's
//! perspective: engine errors end up in logs, never back at the caller. The
//! administrative trigger is the exception; it reports per-tenant results.

use crate::engine::{SyncEngine, TenantSyncReport};
use contentsync_types::{ContentItem, ContentItemId, ContentStatus, TenantId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Shared flag that suppresses sync while bulk imports or autosaves are in
/// flight. Clones share the same underlying flag.
///
/// Suppression nests: the flag stays active until every outstanding
/// [`SuppressGuard`] has dropped.
#[derive(Debug, Clone, Default)]
pub struct SyncSuppressor {
    depth: Arc<AtomicUsize>,
}

impl SyncSuppressor {
    /// Creates an inactive suppressor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates suppression for the lifetime of the returned guard.
    #[must_use]
    pub fn suppress(&self) -> SuppressGuard {
        self.depth.fetch_add(1, Ordering::SeqCst);
        SuppressGuard {
            depth: self.depth.clone(),
        }
    }

    /// Whether sync is currently suppressed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.depth.load(Ordering::SeqCst) > 0
    }
}

/// RAII guard holding suppression active.
#[derive(Debug)]
pub struct SuppressGuard {
    depth: Arc<AtomicUsize>,
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Inbound adapter between content lifecycle notifications and the engine.
pub struct EventGateway {
    engine: Arc<SyncEngine>,
}

impl EventGateway {
    /// Creates a gateway over the engine.
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self { engine }
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    /// Content item changed status.
    pub async fn on_status_transition(
        &self,
        new_status: ContentStatus,
        old_status: ContentStatus,
        item: &ContentItem,
    ) {
        if let Err(e) = self
            .engine
            .handle_transition(new_status, old_status, item)
            .await
        {
            warn!(item = %item.id, "sync on transition failed: {e}");
        }
    }

    /// Content item was hard-deleted.
    pub async fn on_delete(&self, item_id: ContentItemId) {
        if let Err(e) = self.engine.handle_delete(item_id).await {
            warn!(item = %item_id, "sync on delete failed: {e}");
        }
    }

    /// Request to schedule a bulk sync. A request without a tenant resolves
    /// to the configured default tenant. Returns whether this request
    /// scheduled (first call wins).
    pub async fn on_schedule_sync(&self, tenant: Option<TenantId>) -> bool {
        let tenant = tenant.unwrap_or(self.engine.config().default_tenant);
        match self.engine.schedule_sync(tenant).await {
            Ok(scheduled) => scheduled,
            Err(e) => {
                warn!(%tenant, "schedule sync failed: {e}");
                false
            }
        }
    }

    /// Administrative trigger: run every scheduled bulk sync and report
    /// per-tenant results.
    pub async fn on_admin_trigger(&self) -> Vec<TenantSyncReport> {
        match self.engine.run_pending_syncs().await {
            Ok(reports) => reports,
            Err(e) => {
                warn!("bulk sync run failed: {e}");
                Vec::new()
            }
        }
    }
}
