//! Routing configuration boundary.

use crate::error::SyncResult;
use async_trait::async_trait;
use contentsync_types::{TenantConfig, TenantId};

/// Source of per-tenant routing configuration.
///
/// The record for [`TenantId::GLOBAL`] is the fleet-wide one: its
/// `cross_tenant_search_active` flag overrides routing for every tenant.
/// Tenants with no stored record get [`TenantConfig::default`] (no synced
/// types, cross-tenant search off).
#[async_trait]
pub trait TenantConfigSource: Send + Sync {
    /// Loads the config for a tenant.
    async fn config_for(&self, tenant: TenantId) -> SyncResult<TenantConfig>;
}
