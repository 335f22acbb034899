//! Document builder — flattens a content item into an index document.
//!
//! Pure over the item plus accessor lookups: author, assigned terms grouped
//! by taxonomy, and non-protected metadata. Documents are built fresh per
//! sync and never persisted.

use crate::accessor::ContentAccessor;
use crate::error::SyncResult;
use contentsync_types::{Author, ContentItem, ContentStatus, IndexDocument, Term};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Meta keys starting with an underscore are internal to the content store
/// and never indexed.
fn is_protected_meta(key: &str) -> bool {
    key.starts_with('_')
}

/// Builds index documents from content items.
pub struct DocumentBuilder {
    accessor: Arc<dyn ContentAccessor>,
}

impl DocumentBuilder {
    /// Creates a builder over the given content accessor.
    pub fn new(accessor: Arc<dyn ContentAccessor>) -> Self {
        Self { accessor }
    }

    /// Flattens `item` into an [`IndexDocument`].
    pub async fn build(&self, item: &ContentItem) -> SyncResult<IndexDocument> {
        let author = self
            .accessor
            .author(item.author_id)
            .await?
            .unwrap_or_else(Author::unknown);

        let terms = self.prepare_terms(item).await?;
        let meta = self.prepare_meta(item).await?;

        Ok(IndexDocument {
            item_id: item.id,
            author,
            created: item.created,
            created_utc: item.created_utc,
            title: item.title.clone(),
            excerpt: item.excerpt.clone(),
            body: item.body.clone(),
            // Documents are only ever built for publishable items.
            status: ContentStatus::Published,
            slug: item.slug.clone(),
            modified: item.modified,
            modified_utc: item.modified_utc,
            parent_id: item.parent_id,
            content_type: item.content_type.clone(),
            mime_type: item.mime_type.clone(),
            permalink: item.permalink.clone(),
            terms,
            meta,
            tenant_id: item.tenant_id,
        })
    }

    /// Collects assigned terms grouped by taxonomy name. Taxonomies with no
    /// assigned terms are omitted entirely.
    async fn prepare_terms(&self, item: &ContentItem) -> SyncResult<BTreeMap<String, Vec<Term>>> {
        let taxonomies = self.accessor.taxonomies_for(&item.content_type).await?;
        if taxonomies.is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut terms = BTreeMap::new();
        for taxonomy in taxonomies {
            let assigned = self.accessor.assigned_terms(item.id, &taxonomy).await?;
            if assigned.is_empty() {
                continue;
            }
            terms.insert(taxonomy, assigned);
        }

        Ok(terms)
    }

    /// Collects non-protected metadata, decoding values from their storage
    /// encoding (JSON, with plain-string fallback for unencoded values).
    async fn prepare_meta(
        &self,
        item: &ContentItem,
    ) -> SyncResult<BTreeMap<String, serde_json::Value>> {
        let raw = self.accessor.raw_meta(item.id).await?;

        if raw.is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut prepared = BTreeMap::new();
        for (key, value) in raw {
            if is_protected_meta(&key) {
                debug!(item = %item.id, %key, "skipping protected meta key");
                continue;
            }
            let decoded = serde_json::from_str(&value)
                .unwrap_or_else(|_| serde_json::Value::String(value));
            prepared.insert(key, decoded);
        }

        Ok(prepared)
    }
}
