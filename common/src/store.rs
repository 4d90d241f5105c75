use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::item::{GroceryItem, ItemId, ItemPatch, NewItem};

/// Errors from item store backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The backing medium could not be read or written.
    Storage(String),
    /// Stored data exists but does not parse as a list of items.
    Corrupt(String),
    /// A remote collection answered with an error or not at all.
    Remote(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(msg) => write!(f, "storage unavailable: {msg}"),
            Self::Corrupt(msg) => write!(f, "stored list is corrupt: {msg}"),
            Self::Remote(msg) => write!(f, "remote store failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// CRUD over the grocery list, independent of where the list lives.
///
/// Backends: [`MemoryStore`], [`KeyValueStore`](crate::key_value::KeyValueStore)
/// (browser storage), the server's file-backed collection, and the UI's remote
/// store over the server API. None of them validate names; that is the input
/// layer's job.
#[allow(async_fn_in_trait)]
pub trait ItemStore {
    /// All items in insertion order.
    async fn list(&self) -> Result<Vec<GroceryItem>, StoreError>;

    /// Append an item under a fresh id. New items start incomplete.
    async fn add(&self, item: NewItem) -> Result<GroceryItem, StoreError>;

    /// Remove by id. Returns whether any item matched.
    async fn remove(&self, id: &ItemId) -> Result<bool, StoreError>;

    /// Overwrite fields of the matching item. `None` when the id is unknown.
    async fn update(
        &self,
        id: &ItemId,
        patch: ItemPatch,
    ) -> Result<Option<GroceryItem>, StoreError>;

    /// Flip the completion flag of the matching item.
    async fn toggle(&self, id: &ItemId) -> Result<Option<GroceryItem>, StoreError> {
        let current = self.list().await?.into_iter().find(|item| &item.id == id);
        match current {
            Some(item) => self.update(id, ItemPatch::completed(!item.completed)).await,
            None => Ok(None),
        }
    }
}

// ─── Vector operations shared by load-modify-store backends ─────────────────

/// Append `item` to `items` under a fresh id and return the stored copy.
pub fn insert_item(items: &mut Vec<GroceryItem>, item: NewItem) -> GroceryItem {
    let id = ItemId::next_for(items, Utc::now());
    let created = GroceryItem::new(id, item);
    items.push(created.clone());
    created
}

/// Drop every item with `id`. Returns whether anything was removed.
pub fn remove_item(items: &mut Vec<GroceryItem>, id: &ItemId) -> bool {
    let before = items.len();
    items.retain(|item| &item.id != id);
    items.len() < before
}

/// Apply `patch` to the item with `id`, returning the updated copy.
pub fn patch_item(
    items: &mut [GroceryItem],
    id: &ItemId,
    patch: ItemPatch,
) -> Option<GroceryItem> {
    let item = items.iter_mut().find(|item| &item.id == id)?;
    item.apply(patch);
    Some(item.clone())
}

// ─── In-memory backend ──────────────────────────────────────────────────────

/// Process-local list. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<Vec<GroceryItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<GroceryItem>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    fn items(&self) -> MutexGuard<'_, Vec<GroceryItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ItemStore for MemoryStore {
    async fn list(&self) -> Result<Vec<GroceryItem>, StoreError> {
        Ok(self.items().clone())
    }

    async fn add(&self, item: NewItem) -> Result<GroceryItem, StoreError> {
        Ok(insert_item(&mut self.items(), item))
    }

    async fn remove(&self, id: &ItemId) -> Result<bool, StoreError> {
        Ok(remove_item(&mut self.items(), id))
    }

    async fn update(
        &self,
        id: &ItemId,
        patch: ItemPatch,
    ) -> Result<Option<GroceryItem>, StoreError> {
        Ok(patch_item(&mut self.items(), id, patch))
    }
}
