//! Bulk-sync progress tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-tenant bulk-sync progress.
///
/// `start_time` unset means no bulk sync is scheduled for the tenant. Once
/// set it stays set until the tenant's listing is exhausted (or the sync is
/// explicitly cancelled), at which point the whole cursor resets.
/// `items_processed` is an offset into the tenant's publishable-item
/// listing; it only ever grows while a sync is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCursor {
    /// When the bulk sync was scheduled; `None` means nothing is scheduled.
    pub start_time: Option<DateTime<Utc>>,
    /// Offset into the tenant's publishable-item listing.
    pub items_processed: u64,
}

impl SyncCursor {
    /// Whether a bulk sync is scheduled for this tenant.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.start_time.is_some()
    }

    /// Clears the cursor back to its unscheduled state.
    pub fn reset(&mut self) {
        self.start_time = None;
        self.items_processed = 0;
    }
}
