use contentsync_engine::testing::{item, MockConfigSource, MockContentAccessor, MockIndexClient};
use contentsync_engine::{EventGateway, SyncConfig, SyncEngine, SyncSuppressor};
use contentsync_store::{MemoryStateStore, SyncStateStore};
use contentsync_types::{ContentItemId, ContentStatus, TenantConfig, TenantId};
use std::sync::Arc;

fn gateway() -> (
    EventGateway,
    Arc<MockContentAccessor>,
    Arc<MockIndexClient>,
    Arc<MemoryStateStore>,
    Arc<MockConfigSource>,
) {
    let accessor = Arc::new(MockContentAccessor::new());
    let index = Arc::new(MockIndexClient::new());
    let store = Arc::new(MemoryStateStore::new());
    let configs = Arc::new(MockConfigSource::new());
    let engine = Arc::new(SyncEngine::new(
        accessor.clone(),
        index.clone(),
        store.clone(),
        configs.clone(),
        SyncConfig {
            default_tenant: TenantId::new(1),
            ..SyncConfig::default()
        },
    ));
    (EventGateway::new(engine), accessor, index, store, configs)
}

// ── Suppressor ───────────────────────────────────────────────────

#[test]
fn suppressor_starts_inactive() {
    let suppressor = SyncSuppressor::new();
    assert!(!suppressor.is_active());
}

#[test]
fn suppressor_nests() {
    let suppressor = SyncSuppressor::new();

    let outer = suppressor.suppress();
    assert!(suppressor.is_active());

    {
        let _inner = suppressor.suppress();
        assert!(suppressor.is_active());
    }
    // Outer guard still alive.
    assert!(suppressor.is_active());

    drop(outer);
    assert!(!suppressor.is_active());
}

#[test]
fn suppressor_clones_share_state() {
    let suppressor = SyncSuppressor::new();
    let other = suppressor.clone();

    let _guard = suppressor.suppress();
    assert!(other.is_active());
}

// ── Lifecycle events ─────────────────────────────────────────────

#[tokio::test]
async fn transition_event_reaches_the_index() {
    let (gw, _accessor, index, store, configs) = gateway();
    configs.set(TenantId::new(1), TenantConfig::with_types(["article"]));
    let source = item(42, 1, "article");

    gw.on_status_transition(ContentStatus::Published, ContentStatus::Draft, &source)
        .await;

    assert_eq!(index.index_calls().len(), 1);
    assert!(store.is_marked(source.id, TenantId::new(1)).await.unwrap());
}

#[tokio::test]
async fn delete_event_reaches_the_index() {
    let (gw, accessor, index, store, configs) = gateway();
    configs.set(TenantId::new(1), TenantConfig::with_types(["article"]));
    let source = item(42, 1, "article");
    accessor.add_item(source.clone());
    store
        .put_document_id(source.id, TenantId::new(1), "es5")
        .await
        .unwrap();

    gw.on_delete(source.id).await;

    let deletes = index.delete_calls();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].document_id, "es5");
}

#[tokio::test]
async fn delete_of_unknown_item_is_silent() {
    let (gw, _accessor, index, _store, _configs) = gateway();
    // Fire-and-forget: nothing to assert beyond "no call, no panic".
    gw.on_delete(ContentItemId::new(404)).await;
    assert!(index.delete_calls().is_empty());
}

// ── Scheduling & admin trigger ───────────────────────────────────

#[tokio::test]
async fn schedule_without_tenant_uses_default() {
    let (gw, _accessor, _index, store, _configs) = gateway();

    assert!(gw.on_schedule_sync(None).await);

    assert!(store.cursor(TenantId::new(1)).await.unwrap().is_scheduled());
    assert!(!store.cursor(TenantId::new(2)).await.unwrap().is_scheduled());
}

#[tokio::test]
async fn schedule_is_idempotent_through_the_gateway() {
    let (gw, _accessor, _index, _store, _configs) = gateway();

    assert!(gw.on_schedule_sync(Some(TenantId::new(3))).await);
    assert!(!gw.on_schedule_sync(Some(TenantId::new(3))).await);
}

#[tokio::test]
async fn admin_trigger_reports_per_tenant() {
    let (gw, accessor, index, _store, configs) = gateway();
    configs.set(TenantId::new(1), TenantConfig::with_types(["article"]));
    configs.set(TenantId::new(2), TenantConfig::with_types(["article"]));
    for i in 1..=3u64 {
        accessor.add_item(item(i, 1, "article"));
    }
    for i in 10..=11u64 {
        accessor.add_item(item(i, 2, "article"));
    }
    gw.on_schedule_sync(Some(TenantId::new(1))).await;
    gw.on_schedule_sync(Some(TenantId::new(2))).await;

    let reports = gw.on_admin_trigger().await;

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.completed));
    assert_eq!(reports.iter().map(|r| r.indexed).sum::<u64>(), 5);
    assert_eq!(index.index_calls().len(), 5);
}
