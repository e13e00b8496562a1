use crate::error::Result;
use crate::events::{PartialRectangle, Rectangle};
use crate::{debug_if_enabled, keep_error};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;

use super::r#trait::BoundsStore;

/// JSON-файл вида `{ "<key>": { "left": .., "top": .., "width": .., "height": .. } }`.
///
/// Остальные ключи файла сохраняются как есть.
pub struct FileBoundsStore {
    path: PathBuf,
    key: String,
    // Сериализует read-modify-write внутри процесса
    write_lock: Mutex<()>,
}

impl FileBoundsStore {
    pub fn new(path: PathBuf, key: String) -> Self {
        Self {
            path,
            key,
            write_lock: Mutex::new(()),
        }
    }

    async fn read_map(&self) -> Result<Option<Map<String, Value>>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Value>(&raw)? {
            Value::Object(map) => Ok(Some(map)),
            other => Err(keep_error!(
                store,
                "{:?}: ожидался JSON-объект, получено {}",
                self.path,
                other
            )),
        }
    }
}

#[async_trait::async_trait]
impl BoundsStore for FileBoundsStore {
    async fn get(&self) -> Result<Option<PartialRectangle>> {
        let Some(mut map) = self.read_map().await? else {
            debug_if_enabled!("Файл {:?} отсутствует", self.path);
            return Ok(None);
        };

        match map.remove(&self.key) {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    async fn set(&self, bounds: Rectangle) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut map = self.read_map().await?.unwrap_or_default();
        map.insert(self.key.clone(), serde_json::to_value(bounds)?);
        let body = serde_json::to_vec_pretty(&Value::Object(map))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug_if_enabled!("Размеры {} записаны в {:?}", bounds, self.path);
        Ok(())
    }
}
