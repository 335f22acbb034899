//! Per-tenant routing configuration.

use crate::content::ContentType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Routing configuration for one tenant.
///
/// The record stored for [`TenantId::GLOBAL`](crate::TenantId::GLOBAL) is
/// special: its `cross_tenant_search_active` flag decides routing for the
/// whole fleet. When it is true every document goes to the global index,
/// regardless of the flag on the item's own tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Content types this tenant syncs. Empty means the tenant does not
    /// participate in sync at all.
    pub synced_types: BTreeSet<ContentType>,
    /// Whether cross-tenant search is active. Only consulted on the global
    /// tenant's record for routing decisions.
    pub cross_tenant_search_active: bool,
}

impl TenantConfig {
    /// Config that syncs the given types, cross-tenant search off.
    pub fn with_types<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ContentType>,
    {
        Self {
            synced_types: types.into_iter().map(Into::into).collect(),
            cross_tenant_search_active: false,
        }
    }

    /// Whether the given type is synced by this tenant.
    #[must_use]
    pub fn syncs(&self, content_type: &ContentType) -> bool {
        self.synced_types.contains(content_type)
    }
}
