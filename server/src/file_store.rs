use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use grocery_common::item::{GroceryItem, ItemId, ItemPatch, NewItem};
use grocery_common::store::{insert_item, patch_item, remove_item, ItemStore, StoreError};
use tokio::sync::Mutex;

/// Item collection kept as a pretty-printed JSON array in one file.
///
/// A missing or empty file reads as an empty list. Read-modify-write cycles
/// are serialized within this process only.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<GroceryItem>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Storage(format!(
                    "read {}: {e}",
                    self.path.display()
                )))
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))
    }

    async fn save(&self, items: &[GroceryItem]) -> Result<(), StoreError> {
        let bytes =
            serde_json::to_vec_pretty(items).map_err(|e| StoreError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| StoreError::Storage(format!("write {}: {e}", self.path.display())))
    }
}

impl ItemStore for FileStore {
    async fn list(&self) -> Result<Vec<GroceryItem>, StoreError> {
        self.load().await
    }

    async fn add(&self, item: NewItem) -> Result<GroceryItem, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.load().await?;
        let created = insert_item(&mut items, item);
        self.save(&items).await?;
        Ok(created)
    }

    async fn remove(&self, id: &ItemId) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.load().await?;
        if !remove_item(&mut items, id) {
            return Ok(false);
        }
        self.save(&items).await?;
        Ok(true)
    }

    async fn update(
        &self,
        id: &ItemId,
        patch: ItemPatch,
    ) -> Result<Option<GroceryItem>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.load().await?;
        let updated = patch_item(&mut items, id, patch);
        if updated.is_some() {
            self.save(&items).await?;
        }
        Ok(updated)
    }

    async fn toggle(&self, id: &ItemId) -> Result<Option<GroceryItem>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.load().await?;
        let Some(current) = items.iter().find(|item| &item.id == id) else {
            return Ok(None);
        };
        let patch = ItemPatch::completed(!current.completed);
        let updated = patch_item(&mut items, id, patch);
        self.save(&items).await?;
        Ok(updated)
    }
}

/// Overwrite `path` with `value` as two-space indented JSON.
pub async fn write_pretty_json(path: &Path, value: &serde_json::Value) -> std::io::Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, bytes).await
}
