use chrono::{TimeZone, Utc};
use contentsync_store::{MemoryStateStore, SqliteStateStore, StateStoreError, SyncStateStore};
use contentsync_types::{ContentItemId, SyncCursor, TenantId};

fn stores() -> Vec<(&'static str, Box<dyn SyncStateStore>)> {
    vec![
        ("memory", Box::new(MemoryStateStore::new())),
        ("sqlite", Box::new(SqliteStateStore::open_in_memory().unwrap())),
    ]
}

// ── Cursors ──────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_tenant_gets_default_cursor() {
    for (name, store) in stores() {
        let cursor = store.cursor(TenantId::new(7)).await.unwrap();
        assert_eq!(cursor, SyncCursor::default(), "{name}");
        assert!(!cursor.is_scheduled(), "{name}");
    }
}

#[tokio::test]
async fn cursor_roundtrip() {
    for (name, store) in stores() {
        let tenant = TenantId::new(3);
        let cursor = SyncCursor {
            start_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()),
            items_processed: 42,
        };

        store.put_cursor(tenant, &cursor).await.unwrap();
        assert_eq!(store.cursor(tenant).await.unwrap(), cursor, "{name}");
    }
}

#[tokio::test]
async fn cursor_overwrite_keeps_latest() {
    for (name, store) in stores() {
        let tenant = TenantId::new(3);
        let mut cursor = SyncCursor {
            start_time: Some(Utc::now()),
            items_processed: 1,
        };
        store.put_cursor(tenant, &cursor).await.unwrap();

        cursor.items_processed = 2;
        store.put_cursor(tenant, &cursor).await.unwrap();

        assert_eq!(store.cursor(tenant).await.unwrap().items_processed, 2, "{name}");
    }
}

#[tokio::test]
async fn reset_cursor_clears_schedule_and_offset() {
    for (name, store) in stores() {
        let tenant = TenantId::new(5);
        store
            .put_cursor(
                tenant,
                &SyncCursor {
                    start_time: Some(Utc::now()),
                    items_processed: 99,
                },
            )
            .await
            .unwrap();

        store.reset_cursor(tenant).await.unwrap();

        let cursor = store.cursor(tenant).await.unwrap();
        assert!(!cursor.is_scheduled(), "{name}");
        assert_eq!(cursor.items_processed, 0, "{name}");
    }
}

#[tokio::test]
async fn cursors_are_per_tenant() {
    for (name, store) in stores() {
        let a = TenantId::new(1);
        let b = TenantId::new(2);
        store
            .put_cursor(
                a,
                &SyncCursor {
                    start_time: Some(Utc::now()),
                    items_processed: 10,
                },
            )
            .await
            .unwrap();

        assert!(!store.cursor(b).await.unwrap().is_scheduled(), "{name}");
    }
}

// ── Markers ──────────────────────────────────────────────────────

#[tokio::test]
async fn mark_is_compare_and_set() {
    for (name, store) in stores() {
        let item = ContentItemId::new(42);
        let tenant = TenantId::new(1);

        assert!(!store.is_marked(item, tenant).await.unwrap(), "{name}");
        assert!(store.mark(item, tenant).await.unwrap(), "{name}: first mark should win");
        assert!(!store.mark(item, tenant).await.unwrap(), "{name}: second mark should lose");
        assert!(store.is_marked(item, tenant).await.unwrap(), "{name}");
    }
}

#[tokio::test]
async fn markers_are_keyed_by_item_and_tenant() {
    for (name, store) in stores() {
        let item = ContentItemId::new(42);
        store.mark(item, TenantId::new(1)).await.unwrap();

        assert!(!store.is_marked(item, TenantId::new(2)).await.unwrap(), "{name}");
        assert!(
            !store.is_marked(ContentItemId::new(43), TenantId::new(1)).await.unwrap(),
            "{name}"
        );
    }
}

// ── Document ids & synced-at ─────────────────────────────────────

#[tokio::test]
async fn document_id_roundtrip() {
    for (name, store) in stores() {
        let item = ContentItemId::new(7);
        let tenant = TenantId::new(1);

        assert_eq!(store.document_id(item, tenant).await.unwrap(), None, "{name}");

        store.put_document_id(item, tenant, "es1").await.unwrap();
        assert_eq!(
            store.document_id(item, tenant).await.unwrap().as_deref(),
            Some("es1"),
            "{name}"
        );

        store.put_document_id(item, tenant, "es2").await.unwrap();
        assert_eq!(
            store.document_id(item, tenant).await.unwrap().as_deref(),
            Some("es2"),
            "{name}"
        );
    }
}

#[tokio::test]
async fn synced_at_roundtrip() {
    for (name, store) in stores() {
        let item = ContentItemId::new(7);
        let tenant = TenantId::new(1);
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();

        assert_eq!(store.synced_at(item, tenant).await.unwrap(), None, "{name}");

        store.record_synced_at(item, tenant, at).await.unwrap();
        assert_eq!(store.synced_at(item, tenant).await.unwrap(), Some(at), "{name}");
    }
}

#[tokio::test]
async fn synced_at_does_not_clobber_document_id() {
    for (name, store) in stores() {
        let item = ContentItemId::new(7);
        let tenant = TenantId::new(1);

        store.put_document_id(item, tenant, "es1").await.unwrap();
        store.record_synced_at(item, tenant, Utc::now()).await.unwrap();

        assert_eq!(
            store.document_id(item, tenant).await.unwrap().as_deref(),
            Some("es1"),
            "{name}"
        );
    }
}

// ── SQLite persistence ───────────────────────────────────────────

#[tokio::test]
async fn sqlite_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync-state.db");
    let tenant = TenantId::new(4);
    let item = ContentItemId::new(11);

    {
        let store = SqliteStateStore::new(&path).unwrap();
        store
            .put_cursor(
                tenant,
                &SyncCursor {
                    start_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
                    items_processed: 6,
                },
            )
            .await
            .unwrap();
        store.mark(item, tenant).await.unwrap();
        store.put_document_id(item, tenant, "es9").await.unwrap();
    }

    let store = SqliteStateStore::new(&path).unwrap();
    let cursor = store.cursor(tenant).await.unwrap();
    assert!(cursor.is_scheduled());
    assert_eq!(cursor.items_processed, 6);
    assert!(store.is_marked(item, tenant).await.unwrap());
    assert_eq!(store.document_id(item, tenant).await.unwrap().as_deref(), Some("es9"));
}

#[tokio::test]
async fn sqlite_rejects_ids_too_large_for_storage() {
    // SQLite integers are signed 64-bit; an id past i64::MAX must error
    // out instead of wrapping to a different row key.
    let store = SqliteStateStore::open_in_memory().unwrap();
    let item = ContentItemId::new(u64::MAX);
    let tenant = TenantId::new(1);

    let err = store.mark(item, tenant).await.unwrap_err();
    assert!(matches!(err, StateStoreError::InvalidData(_)));

    let err = store.cursor(TenantId::new(u64::MAX)).await.unwrap_err();
    assert!(matches!(err, StateStoreError::InvalidData(_)));

    // In-range ids are unaffected.
    assert!(store.mark(ContentItemId::new(1), tenant).await.unwrap());
}
