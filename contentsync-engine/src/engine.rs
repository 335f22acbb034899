//! Sync engine — keeps the search index in step with the content store.
//!
//! The engine decides, per item, whether to index-as-new or refresh an
//! existing document; tracks that decision through the state store's
//! markers; routes writes to the right physical index (per-tenant vs. the
//! shared global index); and drives the resumable bulk backfill across
//! tenants.

use crate::accessor::ContentAccessor;
use crate::config::TenantConfigSource;
use crate::document::DocumentBuilder;
use crate::error::SyncResult;
use crate::gateway::SyncSuppressor;
use crate::index::{IndexClient, IndexReceipt};
use chrono::Utc;
use contentsync_store::SyncStateStore;
use contentsync_types::{
    ContentItem, ContentItemId, ContentStatus, ContentType, IndexDocument, TenantId,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Items fetched per page during bulk sync.
pub const BULK_PAGE_SIZE: usize = 350;

/// Configuration for the sync engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Page size for the bulk-sync listing query.
    pub page_size: usize,
    /// Timeout for each index client call (ms). A timed-out call is treated
    /// like an empty response: nothing is mutated.
    pub index_timeout_ms: u64,
    /// Tenant used when a schedule request does not name one
    /// (single-tenant deployments).
    pub default_tenant: TenantId,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: BULK_PAGE_SIZE,
            index_timeout_ms: 30_000,
            default_tenant: TenantId::GLOBAL,
        }
    }
}

/// What a `decide_and_sync` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// First successful index write for this (item, tenant): marker set,
    /// document id recorded.
    Indexed {
        /// The index's id for the new document.
        document_id: String,
    },
    /// Item was already marked; the upsert refreshed the document and only
    /// the last-synced stamp moved.
    Refreshed,
    /// The index gave an empty response, errored, or timed out. Nothing was
    /// mutated; the next event or bulk pass retries.
    IndexUnavailable,
}

/// Per-tenant result of a bulk-sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantSyncReport {
    pub tenant_id: TenantId,
    /// Items attempted during this run.
    pub processed: u64,
    /// Items the index accepted (new or refreshed).
    pub indexed: u64,
    /// Items the index did not accept.
    pub failed: u64,
    /// Whether the tenant's listing was exhausted and its cursor reset.
    pub completed: bool,
    /// Set when the tenant's loop aborted early.
    pub error: Option<String>,
}

impl TenantSyncReport {
    fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            processed: 0,
            indexed: 0,
            failed: 0,
            completed: false,
            error: None,
        }
    }

    fn failed_outright(tenant_id: TenantId, error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(tenant_id)
        }
    }
}

/// The sync engine. Explicitly constructed with its collaborators; no
/// ambient state, no globals.
pub struct SyncEngine {
    accessor: Arc<dyn ContentAccessor>,
    index: Arc<dyn IndexClient>,
    store: Arc<dyn SyncStateStore>,
    configs: Arc<dyn TenantConfigSource>,
    builder: DocumentBuilder,
    config: SyncConfig,
    suppressor: SyncSuppressor,
    /// Serializes cursor read-modify-write. A lost cursor update is the one
    /// race that skips or duplicates items, so scheduling and each tenant's
    /// bulk pass hold this.
    cursor_lock: Mutex<()>,
}

impl SyncEngine {
    /// Creates a sync engine over the given collaborators.
    pub fn new(
        accessor: Arc<dyn ContentAccessor>,
        index: Arc<dyn IndexClient>,
        store: Arc<dyn SyncStateStore>,
        configs: Arc<dyn TenantConfigSource>,
        config: SyncConfig,
    ) -> Self {
        let builder = DocumentBuilder::new(accessor.clone());
        Self {
            accessor,
            index,
            store,
            configs,
            builder,
            config,
            suppressor: SyncSuppressor::new(),
            cursor_lock: Mutex::new(()),
        }
    }

    /// Handle for suppressing sync during bulk imports and autosaves.
    pub fn suppressor(&self) -> SyncSuppressor {
        self.suppressor.clone()
    }

    /// The engine's configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    // ── Per-item sync ────────────────────────────────────────────

    /// Syncs one item to the index: builds the document, routes it, and
    /// issues exactly one index call.
    ///
    /// `tenant_id` keys the marker/document-id facts (normally the item's
    /// own tenant). `host_tenant` is strictly a routing hint: the tenant
    /// whose index should receive the write when cross-tenant search is
    /// off. When the global config has cross-tenant search on, the write
    /// goes to the global index no matter what.
    ///
    /// Index failures are non-fatal ([`SyncOutcome::IndexUnavailable`],
    /// nothing mutated); state-store failures propagate.
    pub async fn decide_and_sync(
        &self,
        item: &ContentItem,
        tenant_id: TenantId,
        host_tenant: Option<TenantId>,
    ) -> SyncResult<SyncOutcome> {
        let target = self.route_target(host_tenant, item.tenant_id).await?;
        let document = self.builder.build(item).await?;

        if !self.store.is_marked(item.id, tenant_id).await? {
            match self.index_with_timeout(&document, target).await {
                Some(receipt) => {
                    self.store.mark(item.id, tenant_id).await?;
                    self.store
                        .put_document_id(item.id, tenant_id, &receipt.document_id)
                        .await?;
                    self.store
                        .record_synced_at(item.id, tenant_id, Utc::now())
                        .await?;
                    debug!(item = %item.id, tenant = %tenant_id, doc = %receipt.document_id,
                        "indexed new document");
                    Ok(SyncOutcome::Indexed {
                        document_id: receipt.document_id,
                    })
                }
                None => Ok(SyncOutcome::IndexUnavailable),
            }
        } else {
            // Already marked: the index call is an idempotent upsert, only
            // the last-synced stamp moves.
            match self.index_with_timeout(&document, target).await {
                Some(_) => {
                    self.store
                        .record_synced_at(item.id, tenant_id, Utc::now())
                        .await?;
                    debug!(item = %item.id, tenant = %tenant_id, "refreshed document");
                    Ok(SyncOutcome::Refreshed)
                }
                None => Ok(SyncOutcome::IndexUnavailable),
            }
        }
    }

    /// Issues the index call under the configured timeout. Transport
    /// errors, empty responses, and timeouts all collapse to `None`.
    async fn index_with_timeout(
        &self,
        document: &IndexDocument,
        target: Option<TenantId>,
    ) -> Option<IndexReceipt> {
        let timeout = Duration::from_millis(self.config.index_timeout_ms);
        match tokio::time::timeout(timeout, self.index.index_document(document, target)).await {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(e)) => {
                warn!(item = %document.item_id, "index write failed: {e}");
                None
            }
            Err(_) => {
                warn!(item = %document.item_id, "index write timed out");
                None
            }
        }
    }

    /// Resolves the routed index target: the global index iff the global
    /// tenant's cross-tenant flag is on, otherwise the host tenant (falling
    /// back to the item's own tenant).
    async fn route_target(
        &self,
        host_tenant: Option<TenantId>,
        item_tenant: TenantId,
    ) -> SyncResult<Option<TenantId>> {
        if self.cross_tenant_search_active().await? {
            Ok(Some(TenantId::GLOBAL))
        } else {
            Ok(Some(host_tenant.unwrap_or(item_tenant)))
        }
    }

    async fn cross_tenant_search_active(&self) -> SyncResult<bool> {
        let global = self.configs.config_for(TenantId::GLOBAL).await?;
        Ok(global.cross_tenant_search_active)
    }

    // ── Lifecycle-event handlers ─────────────────────────────────

    /// Reacts to a content status transition.
    ///
    /// Only publish transitions of editable, non-revision items whose type
    /// the tenant syncs reach the index. Everything else — drafts, pending,
    /// unpublish — is deliberately ignored: documents are only ever removed
    /// on hard delete. `Ok(None)` means a guard filtered the event.
    pub async fn handle_transition(
        &self,
        new_status: ContentStatus,
        old_status: ContentStatus,
        item: &ContentItem,
    ) -> SyncResult<Option<SyncOutcome>> {
        if new_status != ContentStatus::Published {
            return Ok(None);
        }

        if self.suppressor.is_active() || item.content_type.is_revision() {
            return Ok(None);
        }

        if !self.accessor.can_edit(item.id).await? {
            return Ok(None);
        }

        let tenant_config = self.configs.config_for(item.tenant_id).await?;
        if !tenant_config.syncs(&item.content_type) {
            debug!(item = %item.id, ty = %item.content_type, "type not synced, skipping");
            return Ok(None);
        }

        debug!(item = %item.id, %old_status, %new_status, "syncing on publish");

        let host = self.cross_tenant_host().await?;
        self.decide_and_sync(item, item.tenant_id, host).await.map(Some)
    }

    /// Reacts to a hard delete: removes the item's index document, if one
    /// was ever recorded.
    ///
    /// Fire-and-forget: a failed or unacknowledged delete is logged, never
    /// retried, and no state is cleaned up (the content item itself is
    /// going away). Returns whether a delete call was issued.
    pub async fn handle_delete(&self, item_id: ContentItemId) -> SyncResult<bool> {
        if self.suppressor.is_active() {
            return Ok(false);
        }

        let Some(item) = self.accessor.item(item_id).await? else {
            return Ok(false);
        };

        if !self.accessor.can_edit(item_id).await? {
            return Ok(false);
        }

        let tenant_config = self.configs.config_for(item.tenant_id).await?;
        if !tenant_config.syncs(&item.content_type) {
            return Ok(false);
        }

        let Some(document_id) = self.store.document_id(item_id, item.tenant_id).await? else {
            // Never indexed; nothing to remove.
            return Ok(false);
        };

        let target = self.route_target(None, item.tenant_id).await?;
        match self.index.delete_document(&document_id, target).await {
            Ok(true) => debug!(item = %item_id, doc = %document_id, "deleted index document"),
            Ok(false) => warn!(item = %item_id, doc = %document_id, "index delete not acknowledged"),
            Err(e) => warn!(item = %item_id, doc = %document_id, "index delete failed: {e}"),
        }
        Ok(true)
    }

    /// `Some(GLOBAL)` when cross-tenant search is on, else `None` (route to
    /// the local/default index).
    async fn cross_tenant_host(&self) -> SyncResult<Option<TenantId>> {
        if self.cross_tenant_search_active().await? {
            Ok(Some(TenantId::GLOBAL))
        } else {
            Ok(None)
        }
    }

    // ── Bulk sync ────────────────────────────────────────────────

    /// Schedules a bulk sync for the tenant. First call wins: returns
    /// `true` and stamps `start_time` only if nothing was scheduled;
    /// returns `false` (and leaves the existing stamp alone) otherwise.
    pub async fn schedule_sync(&self, tenant: TenantId) -> SyncResult<bool> {
        let _guard = self.cursor_lock.lock().await;

        let mut cursor = self.store.cursor(tenant).await?;
        if cursor.is_scheduled() {
            return Ok(false);
        }

        cursor.start_time = Some(Utc::now());
        self.store.put_cursor(tenant, &cursor).await?;
        info!(%tenant, "bulk sync scheduled");
        Ok(true)
    }

    /// Runs all scheduled bulk syncs, one tenant at a time.
    ///
    /// Tenants with no synced types or no scheduled cursor are skipped.
    /// Within a tenant, items are processed strictly in listing order and
    /// the cursor is persisted after every item, so an interruption between
    /// any two items resumes exactly where it stopped. A tenant whose
    /// listing is exhausted gets its cursor reset. One tenant's failure
    /// never aborts the others; each tenant that was touched gets a report.
    pub async fn run_pending_syncs(&self) -> SyncResult<Vec<TenantSyncReport>> {
        let tenants = self.accessor.tenant_ids().await?;
        let mut reports = Vec::new();

        for tenant in tenants {
            match self.run_tenant_sync(tenant).await {
                Ok(Some(report)) => {
                    info!(
                        %tenant,
                        processed = report.processed,
                        indexed = report.indexed,
                        failed = report.failed,
                        completed = report.completed,
                        "bulk sync pass finished"
                    );
                    reports.push(report);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(%tenant, "bulk sync failed: {e}");
                    reports.push(TenantSyncReport::failed_outright(tenant, e));
                }
            }
        }

        Ok(reports)
    }

    /// Drains one tenant's scheduled sync. `Ok(None)` when the tenant has
    /// nothing to do (no synced types, or nothing scheduled).
    async fn run_tenant_sync(&self, tenant: TenantId) -> SyncResult<Option<TenantSyncReport>> {
        let tenant_config = self.configs.config_for(tenant).await?;
        if tenant_config.synced_types.is_empty() {
            return Ok(None);
        }

        let _guard = self.cursor_lock.lock().await;

        let mut cursor = self.store.cursor(tenant).await?;
        if !cursor.is_scheduled() {
            return Ok(None);
        }

        let types: Vec<ContentType> = tenant_config.synced_types.iter().cloned().collect();
        let mut report = TenantSyncReport::new(tenant);

        loop {
            let page = self
                .accessor
                .list_publishable(tenant, &types, cursor.items_processed, self.config.page_size)
                .await?;

            if page.is_empty() {
                // Listing exhausted: the tenant is fully synced.
                self.store.reset_cursor(tenant).await?;
                report.completed = true;
                return Ok(Some(report));
            }

            for item in &page {
                cursor.items_processed += 1;
                report.processed += 1;

                // Bulk mode always resolves routing against the global
                // tenant, whatever the item's own tenant is.
                let outcome = match self
                    .decide_and_sync(item, tenant, Some(TenantId::GLOBAL))
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        report.error = Some(e.to_string());
                        return Ok(Some(report));
                    }
                };

                match outcome {
                    SyncOutcome::Indexed { .. } | SyncOutcome::Refreshed => report.indexed += 1,
                    SyncOutcome::IndexUnavailable => report.failed += 1,
                }

                // Per-item checkpoint: an interruption after this write
                // resumes at the next item, never reprocessing this one.
                self.store.put_cursor(tenant, &cursor).await?;
            }
        }
    }
}
