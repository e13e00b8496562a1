use crate::config::Config;
use crate::error::Result;
use crate::events::{PartialRectangle, Rectangle};
use std::sync::Arc;

/// Asynchronous single-record store for the last known window bounds.
///
/// Failures are reported to the caller, which treats them as "no data" on read
/// and drops them on write. Nothing here retries.
#[async_trait::async_trait]
pub trait BoundsStore: Send + Sync {
    /// Read the stored record; `None` if nothing was ever written
    async fn get(&self) -> Result<Option<PartialRectangle>>;

    /// Persist a fully populated rectangle
    async fn set(&self, bounds: Rectangle) -> Result<()>;
}

/// Factory function to create an appropriate bounds store based on the dry_run flag
pub fn create_bounds_store(config: &Config, dry_run: bool) -> Arc<dyn BoundsStore> {
    if dry_run {
        Arc::new(super::dry_store::DryRunBoundsStore::new())
    } else {
        Arc::new(super::file_store::FileBoundsStore::new(
            config.persistence.path.clone(),
            config.persistence.key.clone(),
        ))
    }
}
