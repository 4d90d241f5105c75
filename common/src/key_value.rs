//! String key-value storage and the item store built on top of it.
//!
//! In the browser the UI implements [`KeyValue`] over `window.localStorage`;
//! everywhere else [`MemoryKeyValue`] stands in for it.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::item::{GroceryItem, ItemId, ItemPatch, NewItem};
use crate::store::{insert_item, patch_item, remove_item, ItemStore, StoreError};

/// Key holding the JSON array of grocery items.
pub const ITEMS_KEY: &str = "groceryItems";
/// Key holding the JSON array of supermarkets.
pub const SUPERMARKETS_KEY: &str = "supermarkets";

/// Minimal string storage, shaped like the Web Storage API.
pub trait KeyValue {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<K: KeyValue + ?Sized> KeyValue for &K {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }
}

impl<K: KeyValue + ?Sized> KeyValue for std::rc::Rc<K> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }
}

impl<K: KeyValue + ?Sized> KeyValue for std::sync::Arc<K> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }
}

/// In-process [`KeyValue`] map.
#[derive(Debug, Default)]
pub struct MemoryKeyValue {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryKeyValue {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read and parse the JSON value under `key`. `None` when the key is unset.
pub fn load_json<T, K>(kv: &K, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    K: KeyValue + ?Sized,
{
    match kv.get_item(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Corrupt(format!("{key}: {e}"))),
        None => Ok(None),
    }
}

/// Serialize `value` and store it under `key`, replacing what was there.
pub fn save_json<T, K>(kv: &K, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    K: KeyValue + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|e| StoreError::Storage(e.to_string()))?;
    kv.set_item(key, &raw)
}

/// Item store persisted as one JSON array in key-value storage.
///
/// Every operation reloads the array, so several stores over the same storage
/// see each other's writes (last write wins).
#[derive(Debug)]
pub struct KeyValueStore<K> {
    kv: K,
    key: String,
}

impl<K: KeyValue> KeyValueStore<K> {
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, ITEMS_KEY)
    }

    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    fn load(&self) -> Result<Vec<GroceryItem>, StoreError> {
        Ok(load_json(&self.kv, &self.key)?.unwrap_or_default())
    }

    fn save(&self, items: &[GroceryItem]) -> Result<(), StoreError> {
        save_json(&self.kv, &self.key, items)
    }
}

impl<K: KeyValue> ItemStore for KeyValueStore<K> {
    async fn list(&self) -> Result<Vec<GroceryItem>, StoreError> {
        self.load()
    }

    async fn add(&self, item: NewItem) -> Result<GroceryItem, StoreError> {
        let mut items = self.load()?;
        let created = insert_item(&mut items, item);
        self.save(&items)?;
        Ok(created)
    }

    async fn remove(&self, id: &ItemId) -> Result<bool, StoreError> {
        let mut items = self.load()?;
        if !remove_item(&mut items, id) {
            return Ok(false);
        }
        self.save(&items)?;
        Ok(true)
    }

    async fn update(
        &self,
        id: &ItemId,
        patch: ItemPatch,
    ) -> Result<Option<GroceryItem>, StoreError> {
        let mut items = self.load()?;
        let updated = patch_item(&mut items, id, patch);
        if updated.is_some() {
            self.save(&items)?;
        }
        Ok(updated)
    }
}
