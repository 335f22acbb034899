//! Core type definitions for contentsync.
//!
//! This crate defines the fundamental types shared by the state store and
//! the sync engine:
//! - Tenant, content-item, user, and term identifiers
//! - The read-only content model (items, authors, taxonomy terms)
//! - The index document wire payload
//! - Bulk-sync cursors and per-tenant routing configuration
//!
//! Everything here is plain data: no I/O, no collaborator logic. The engine
//! and store crates build on these types.

mod config;
mod content;
mod cursor;
mod document;
mod ids;

pub use config::TenantConfig;
pub use content::{Author, ContentItem, ContentStatus, ContentType, Term};
pub use cursor::SyncCursor;
pub use document::IndexDocument;
pub use ids::{ContentItemId, TenantId, TermId, UserId};
