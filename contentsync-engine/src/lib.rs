//! Search-index synchronization engine.
//!
//! Keeps an external search index in step with a multi-tenant content
//! store. Two paths feed the index:
//! - **Lifecycle events**: publishing an item (re)indexes it; hard-deleting
//!   an item removes its document. Nothing else touches the index — in
//!   particular, unpublishing does not remove documents.
//! - **Bulk backfill**: a scheduled, resumable walk over every publishable
//!   item of every tenant, checkpointed after each item.
//!
//! # Architecture
//!
//! The engine owns the decision logic only; everything stateful or
//! deployment-specific sits behind a trait:
//!
//! - [`ContentAccessor`] — read-only view over items, authors, terms, meta
//! - [`IndexClient`] — the search backend (index/delete document calls)
//! - [`SyncStateStore`](contentsync_store::SyncStateStore) — cursors,
//!   markers, and document-id facts
//! - [`TenantConfigSource`] — per-tenant synced types + cross-tenant flag
//!
//! [`EventGateway`] is the inbound adapter the content store's notification
//! mechanism calls; it owns the fire-and-forget error policy for lifecycle
//! events.
//!
//! # Example
//!
//! ```
//! use contentsync_engine::testing::{MockConfigSource, MockContentAccessor, MockIndexClient};
//! use contentsync_engine::{SyncConfig, SyncEngine};
//! use contentsync_store::MemoryStateStore;
//! use std::sync::Arc;
//!
//! let engine = SyncEngine::new(
//!     Arc::new(MockContentAccessor::new()),
//!     Arc::new(MockIndexClient::new()),
//!     Arc::new(MemoryStateStore::new()),
//!     Arc::new(MockConfigSource::new()),
//!     SyncConfig::default(),
//! );
//! ```

mod accessor;
mod config;
mod document;
mod engine;
mod error;
mod gateway;
mod index;
pub mod testing;

pub use accessor::ContentAccessor;
pub use config::TenantConfigSource;
pub use document::DocumentBuilder;
pub use engine::{SyncConfig, SyncEngine, SyncOutcome, TenantSyncReport, BULK_PAGE_SIZE};
pub use error::{SyncError, SyncResult};
pub use gateway::{EventGateway, SuppressGuard, SyncSuppressor};
pub use index::{IndexClient, IndexReceipt};
