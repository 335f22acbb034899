//! The read-only content model.
//!
//! These types mirror what the content store hands us: items, their authors,
//! and taxonomy terms. The sync engine never mutates content; it only reads
//! it to build index documents.

use crate::ids::{ContentItemId, TenantId, TermId, UserId};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a content item.
///
/// Only `Published` ever triggers a sync; the engine ignores all other
/// transitions and never removes index documents on unpublish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Pending,
    #[serde(rename = "publish")]
    Published,
    Trash,
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Pending => "pending",
            ContentStatus::Published => "publish",
            ContentStatus::Trash => "trash",
        };
        f.write_str(s)
    }
}

/// A content type name ("article", "page", ...), normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentType(String);

impl ContentType {
    /// Creates a content type, normalizing to lowercase.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().to_ascii_lowercase())
    }

    /// The distinguished revision type, never synced.
    #[must_use]
    pub fn revision() -> Self {
        Self("revision".to_string())
    }

    /// Returns the type name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the revision type.
    #[must_use]
    pub fn is_revision(&self) -> bool {
        self.0 == "revision"
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A content item as read from the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentItemId,
    /// The tenant this item belongs to.
    pub tenant_id: TenantId,
    pub author_id: UserId,
    /// Parent item, if any (pages and attachments form trees).
    pub parent_id: Option<ContentItemId>,
    pub content_type: ContentType,
    pub status: ContentStatus,
    pub title: String,
    pub body: String,
    pub excerpt: String,
    pub slug: String,
    pub mime_type: String,
    pub permalink: String,
    /// Creation time in the tenant's local timezone.
    pub created: NaiveDateTime,
    pub created_utc: DateTime<Utc>,
    /// Last modification time in the tenant's local timezone.
    pub modified: NaiveDateTime,
    pub modified_utc: DateTime<Utc>,
}

/// Author projection attached to index documents.
///
/// A missing author record flattens to empty strings rather than an absent
/// field, so documents always carry the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub login: String,
    pub display_name: String,
}

impl Author {
    /// Creates an author projection.
    pub fn new(login: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            display_name: display_name.into(),
        }
    }

    /// The empty fallback used when an item's author record is missing.
    #[must_use]
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// A taxonomy term assigned to a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub term_id: TermId,
    pub slug: String,
    pub name: String,
    /// Parent term for hierarchical taxonomies.
    #[serde(rename = "parent")]
    pub parent_id: Option<TermId>,
}
