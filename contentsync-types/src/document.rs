//! The index document wire payload.
//!
//! An `IndexDocument` is the flattened projection of a content item that the
//! index client ships to the search backend. It is built fresh for every
//! sync and never persisted; field names follow the index's document shape.

use crate::content::{Author, ContentStatus, ContentType, Term};
use crate::ids::{ContentItemId, TenantId};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flattened projection of a content item, ready for indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(rename = "post_id")]
    pub item_id: ContentItemId,
    #[serde(rename = "post_author")]
    pub author: Author,
    #[serde(rename = "post_date")]
    pub created: NaiveDateTime,
    #[serde(rename = "post_date_gmt")]
    pub created_utc: DateTime<Utc>,
    #[serde(rename = "post_title")]
    pub title: String,
    #[serde(rename = "post_excerpt")]
    pub excerpt: String,
    #[serde(rename = "post_content")]
    pub body: String,
    #[serde(rename = "post_status")]
    pub status: ContentStatus,
    #[serde(rename = "post_name")]
    pub slug: String,
    #[serde(rename = "post_modified")]
    pub modified: NaiveDateTime,
    #[serde(rename = "post_modified_gmt")]
    pub modified_utc: DateTime<Utc>,
    #[serde(rename = "post_parent")]
    pub parent_id: Option<ContentItemId>,
    #[serde(rename = "post_type")]
    pub content_type: ContentType,
    #[serde(rename = "post_mime_type")]
    pub mime_type: String,
    pub permalink: String,
    /// Assigned terms grouped by taxonomy name. Taxonomies with no assigned
    /// terms are absent, never present as empty entries.
    pub terms: BTreeMap<String, Vec<Term>>,
    /// Non-protected metadata, values decoded from their storage encoding.
    #[serde(rename = "post_meta")]
    pub meta: BTreeMap<String, serde_json::Value>,
    #[serde(rename = "site_id")]
    pub tenant_id: TenantId,
}
