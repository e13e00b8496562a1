use crate::error::Result;
use crate::events::{PartialRectangle, Rectangle};
use parking_lot::RwLock;
use tracing::info;

use super::r#trait::BoundsStore;

/// Хранилище в памяти: ничего не пишет на диск
pub struct DryRunBoundsStore {
    bounds: RwLock<Option<Rectangle>>,
}

impl Default for DryRunBoundsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DryRunBoundsStore {
    pub fn new() -> Self {
        info!("Инициализация DryRunBoundsStore");
        Self {
            bounds: RwLock::new(None),
        }
    }
}

#[async_trait::async_trait]
impl BoundsStore for DryRunBoundsStore {
    async fn get(&self) -> Result<Option<PartialRectangle>> {
        Ok(self.bounds.read().map(PartialRectangle::from))
    }

    async fn set(&self, bounds: Rectangle) -> Result<()> {
        info!("[DRY RUN] Сохранение размеров окна: {}", bounds);
        *self.bounds.write() = Some(bounds);
        Ok(())
    }
}
