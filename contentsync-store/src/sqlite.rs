//! SQLite-backed state store.
//!
//! Uses a single small database file so sync state is isolated from the
//! content store itself. Cursors, markers, and document ids each get a
//! table; timestamps are stored as RFC 3339 text.

use crate::{StateStoreError, StateStoreResult, SyncStateStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contentsync_types::{ContentItemId, SyncCursor, TenantId};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Persistent [`SyncStateStore`] backed by SQLite.
pub struct SqliteStateStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStateStore {
    /// Opens (or creates) a state store at the given path.
    pub fn new(path: impl AsRef<Path>) -> StateStoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StateStoreError::Storage(format!("failed to open state store: {e}")))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Opens an in-memory state store (for testing).
    pub fn open_in_memory() -> StateStoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StateStoreError::Storage(format!("failed to open in-memory state store: {e}"))
        })?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StateStoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS sync_cursors (
                tenant_id INTEGER PRIMARY KEY,
                start_time TEXT,
                items_processed INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS sync_markers (
                item_id INTEGER NOT NULL,
                tenant_id INTEGER NOT NULL,
                PRIMARY KEY (item_id, tenant_id)
            );

            CREATE TABLE IF NOT EXISTS index_documents (
                item_id INTEGER NOT NULL,
                tenant_id INTEGER NOT NULL,
                document_id TEXT,
                synced_at TEXT,
                PRIMARY KEY (item_id, tenant_id)
            );
            ",
        )
        .map_err(|e| StateStoreError::Storage(format!("failed to init state schema: {e}")))?;
        Ok(())
    }
}

fn parse_timestamp(raw: &str) -> StateStoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StateStoreError::InvalidData(format!("bad timestamp {raw:?}: {e}")))
}

/// SQLite integers are signed; an id that does not fit is a caller bug,
/// not something to wrap silently.
fn db_id(value: u64) -> StateStoreResult<i64> {
    i64::try_from(value)
        .map_err(|_| StateStoreError::InvalidData(format!("id out of range for storage: {value}")))
}

fn from_db_count(value: i64) -> StateStoreResult<u64> {
    u64::try_from(value)
        .map_err(|_| StateStoreError::InvalidData(format!("negative stored count: {value}")))
}

#[async_trait]
impl SyncStateStore for SqliteStateStore {
    async fn cursor(&self, tenant: TenantId) -> StateStoreResult<SyncCursor> {
        let conn = self.conn.lock().unwrap();
        let row: Option<(Option<String>, i64)> = conn
            .query_row(
                "SELECT start_time, items_processed FROM sync_cursors WHERE tenant_id = ?1",
                params![db_id(tenant.get())?],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            None => Ok(SyncCursor::default()),
            Some((start, processed)) => {
                let start_time = start.as_deref().map(parse_timestamp).transpose()?;
                Ok(SyncCursor {
                    start_time,
                    items_processed: from_db_count(processed)?,
                })
            }
        }
    }

    async fn put_cursor(&self, tenant: TenantId, cursor: &SyncCursor) -> StateStoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sync_cursors (tenant_id, start_time, items_processed)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (tenant_id) DO UPDATE
             SET start_time = excluded.start_time,
                 items_processed = excluded.items_processed",
            params![
                db_id(tenant.get())?,
                cursor.start_time.map(|t| t.to_rfc3339()),
                db_id(cursor.items_processed)?,
            ],
        )?;
        Ok(())
    }

    async fn reset_cursor(&self, tenant: TenantId) -> StateStoreResult<()> {
        self.put_cursor(tenant, &SyncCursor::default()).await
    }

    async fn is_marked(&self, item: ContentItemId, tenant: TenantId) -> StateStoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM sync_markers WHERE item_id = ?1 AND tenant_id = ?2",
                params![db_id(item.get())?, db_id(tenant.get())?],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    async fn mark(&self, item: ContentItemId, tenant: TenantId) -> StateStoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        // INSERT OR IGNORE + changes() gives compare-and-set semantics under
        // the connection lock.
        conn.execute(
            "INSERT OR IGNORE INTO sync_markers (item_id, tenant_id) VALUES (?1, ?2)",
            params![db_id(item.get())?, db_id(tenant.get())?],
        )?;
        Ok(conn.changes() > 0)
    }

    async fn document_id(
        &self,
        item: ContentItemId,
        tenant: TenantId,
    ) -> StateStoreResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let id: Option<Option<String>> = conn
            .query_row(
                "SELECT document_id FROM index_documents WHERE item_id = ?1 AND tenant_id = ?2",
                params![db_id(item.get())?, db_id(tenant.get())?],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id.flatten())
    }

    async fn put_document_id(
        &self,
        item: ContentItemId,
        tenant: TenantId,
        document_id: &str,
    ) -> StateStoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO index_documents (item_id, tenant_id, document_id)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (item_id, tenant_id) DO UPDATE SET document_id = excluded.document_id",
            params![db_id(item.get())?, db_id(tenant.get())?, document_id],
        )?;
        Ok(())
    }

    async fn record_synced_at(
        &self,
        item: ContentItemId,
        tenant: TenantId,
        at: DateTime<Utc>,
    ) -> StateStoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO index_documents (item_id, tenant_id, synced_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (item_id, tenant_id) DO UPDATE SET synced_at = excluded.synced_at",
            params![db_id(item.get())?, db_id(tenant.get())?, at.to_rfc3339()],
        )?;
        Ok(())
    }

    async fn synced_at(
        &self,
        item: ContentItemId,
        tenant: TenantId,
    ) -> StateStoreResult<Option<DateTime<Utc>>> {
        let conn = self.conn.lock().unwrap();
        let raw: Option<Option<String>> = conn
            .query_row(
                "SELECT synced_at FROM index_documents WHERE item_id = ?1 AND tenant_id = ?2",
                params![db_id(item.get())?, db_id(tenant.get())?],
                |row| row.get(0),
            )
            .optional()?;
        raw.flatten().as_deref().map(parse_timestamp).transpose()
    }
}
