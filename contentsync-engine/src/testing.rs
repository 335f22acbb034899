//! Test doubles for the engine's collaborator traits.
//!
//! Shipped as a regular module (not `cfg(test)`) so integration tests and
//! downstream crates can drive the engine without a real content store or
//! search backend.

use crate::accessor::ContentAccessor;
use crate::config::TenantConfigSource;
use crate::error::{SyncError, SyncResult};
use crate::index::{IndexClient, IndexReceipt};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use contentsync_types::{
    Author, ContentItem, ContentItemId, ContentStatus, ContentType, IndexDocument, TenantConfig,
    TenantId, Term, UserId,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// A published item with fixed timestamps, for tests.
pub fn item(id: u64, tenant: u64, content_type: &str) -> ContentItem {
    let utc = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    ContentItem {
        id: ContentItemId::new(id),
        tenant_id: TenantId::new(tenant),
        author_id: UserId::new(1),
        parent_id: None,
        content_type: ContentType::new(content_type),
        status: ContentStatus::Published,
        title: format!("Item {id}"),
        body: format!("Body of item {id}"),
        excerpt: String::new(),
        slug: format!("item-{id}"),
        mime_type: String::new(),
        permalink: format!("https://tenant-{tenant}.example/item-{id}"),
        created: utc.naive_utc(),
        created_utc: utc,
        modified: utc.naive_utc(),
        modified_utc: utc,
    }
}

// ── Content accessor ─────────────────────────────────────────────

#[derive(Debug, Default)]
struct AccessorState {
    items: Vec<ContentItem>,
    authors: HashMap<UserId, Author>,
    terms: HashMap<(ContentItemId, String), Vec<Term>>,
    taxonomies: HashMap<ContentType, Vec<String>>,
    meta: HashMap<ContentItemId, BTreeMap<String, String>>,
    uneditable: HashSet<ContentItemId>,
    extra_tenants: BTreeSet<TenantId>,
    failing_listings: HashSet<TenantId>,
}

/// In-memory [`ContentAccessor`]. Listing order is by ascending item id,
/// which satisfies the stable-order contract.
#[derive(Debug, Default)]
pub struct MockContentAccessor {
    state: Mutex<AccessorState>,
}

impl MockContentAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&self, item: ContentItem) {
        self.state.lock().unwrap().items.push(item);
    }

    pub fn remove_item(&self, id: ContentItemId) {
        self.state.lock().unwrap().items.retain(|i| i.id != id);
    }

    pub fn set_author(&self, user: UserId, author: Author) {
        self.state.lock().unwrap().authors.insert(user, author);
    }

    pub fn set_terms(&self, item: ContentItemId, taxonomy: &str, terms: Vec<Term>) {
        self.state
            .lock()
            .unwrap()
            .terms
            .insert((item, taxonomy.to_string()), terms);
    }

    pub fn set_taxonomies(&self, content_type: ContentType, taxonomies: Vec<String>) {
        self.state
            .lock()
            .unwrap()
            .taxonomies
            .insert(content_type, taxonomies);
    }

    pub fn set_meta(&self, item: ContentItemId, meta: BTreeMap<String, String>) {
        self.state.lock().unwrap().meta.insert(item, meta);
    }

    /// Makes `can_edit` return false for the item.
    pub fn deny_edit(&self, item: ContentItemId) {
        self.state.lock().unwrap().uneditable.insert(item);
    }

    /// Registers a tenant that has no items (yet).
    pub fn add_tenant(&self, tenant: TenantId) {
        self.state.lock().unwrap().extra_tenants.insert(tenant);
    }

    /// Makes `list_publishable` fail for the tenant.
    pub fn fail_listing_for(&self, tenant: TenantId) {
        self.state.lock().unwrap().failing_listings.insert(tenant);
    }
}

#[async_trait]
impl ContentAccessor for MockContentAccessor {
    async fn item(&self, id: ContentItemId) -> SyncResult<Option<ContentItem>> {
        let state = self.state.lock().unwrap();
        Ok(state.items.iter().find(|i| i.id == id).cloned())
    }

    async fn author(&self, user: UserId) -> SyncResult<Option<Author>> {
        let state = self.state.lock().unwrap();
        Ok(state.authors.get(&user).cloned())
    }

    async fn assigned_terms(
        &self,
        item: ContentItemId,
        taxonomy: &str,
    ) -> SyncResult<Vec<Term>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .terms
            .get(&(item, taxonomy.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn taxonomies_for(&self, content_type: &ContentType) -> SyncResult<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state.taxonomies.get(content_type).cloned().unwrap_or_default())
    }

    async fn raw_meta(&self, item: ContentItemId) -> SyncResult<BTreeMap<String, String>> {
        let state = self.state.lock().unwrap();
        Ok(state.meta.get(&item).cloned().unwrap_or_default())
    }

    async fn list_publishable(
        &self,
        tenant: TenantId,
        types: &[ContentType],
        offset: u64,
        limit: usize,
    ) -> SyncResult<Vec<ContentItem>> {
        let state = self.state.lock().unwrap();
        if state.failing_listings.contains(&tenant) {
            return Err(SyncError::ContentStore(format!(
                "listing unavailable for tenant {tenant}"
            )));
        }
        let mut matching: Vec<ContentItem> = state
            .items
            .iter()
            .filter(|i| {
                i.tenant_id == tenant
                    && i.status == ContentStatus::Published
                    && types.contains(&i.content_type)
            })
            .cloned()
            .collect();
        matching.sort_by_key(|i| i.id);
        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit)
            .collect())
    }

    async fn tenant_ids(&self) -> SyncResult<Vec<TenantId>> {
        let state = self.state.lock().unwrap();
        let mut tenants: BTreeSet<TenantId> = state.extra_tenants.clone();
        tenants.extend(state.items.iter().map(|i| i.tenant_id));
        Ok(tenants.into_iter().collect())
    }

    async fn can_edit(&self, item: ContentItemId) -> SyncResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(!state.uneditable.contains(&item))
    }
}

// ── Index client ─────────────────────────────────────────────────

/// How the mock index responds to writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockIndexMode {
    /// Accept writes, handing out sequential `es{n}` document ids.
    Accept,
    /// Return empty responses (backend refused the write).
    Empty,
    /// Return transport errors.
    Fail,
}

/// A recorded index write.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexCall {
    pub document: IndexDocument,
    pub target: Option<TenantId>,
}

/// A recorded index delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCall {
    pub document_id: String,
    pub target: Option<TenantId>,
}

/// Recording [`IndexClient`] double.
#[derive(Debug)]
pub struct MockIndexClient {
    index_calls: Mutex<Vec<IndexCall>>,
    delete_calls: Mutex<Vec<DeleteCall>>,
    next_id: AtomicU64,
    mode: Mutex<MockIndexMode>,
}

impl Default for MockIndexClient {
    fn default() -> Self {
        Self {
            index_calls: Mutex::new(Vec::new()),
            delete_calls: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            mode: Mutex::new(MockIndexMode::Accept),
        }
    }
}

impl MockIndexClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&self, mode: MockIndexMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn index_calls(&self) -> Vec<IndexCall> {
        self.index_calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<DeleteCall> {
        self.delete_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndexClient for MockIndexClient {
    async fn index_document(
        &self,
        document: &IndexDocument,
        target: Option<TenantId>,
    ) -> SyncResult<Option<IndexReceipt>> {
        self.index_calls.lock().unwrap().push(IndexCall {
            document: document.clone(),
            target,
        });
        match *self.mode.lock().unwrap() {
            MockIndexMode::Accept => {
                let n = self.next_id.fetch_add(1, Ordering::SeqCst);
                Ok(Some(IndexReceipt {
                    document_id: format!("es{n}"),
                }))
            }
            MockIndexMode::Empty => Ok(None),
            MockIndexMode::Fail => Err(SyncError::Index("mock index failure".to_string())),
        }
    }

    async fn delete_document(
        &self,
        document_id: &str,
        target: Option<TenantId>,
    ) -> SyncResult<bool> {
        self.delete_calls.lock().unwrap().push(DeleteCall {
            document_id: document_id.to_string(),
            target,
        });
        match *self.mode.lock().unwrap() {
            MockIndexMode::Accept => Ok(true),
            MockIndexMode::Empty => Ok(false),
            MockIndexMode::Fail => Err(SyncError::Index("mock index failure".to_string())),
        }
    }
}

// ── Config source ────────────────────────────────────────────────

/// In-memory [`TenantConfigSource`]. Tenants without a stored record get
/// the default config.
#[derive(Debug, Default)]
pub struct MockConfigSource {
    configs: Mutex<HashMap<TenantId, TenantConfig>>,
}

impl MockConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, tenant: TenantId, config: TenantConfig) {
        self.configs.lock().unwrap().insert(tenant, config);
    }
}

#[async_trait]
impl TenantConfigSource for MockConfigSource {
    async fn config_for(&self, tenant: TenantId) -> SyncResult<TenantConfig> {
        let configs = self.configs.lock().unwrap();
        Ok(configs.get(&tenant).cloned().unwrap_or_default())
    }
}
