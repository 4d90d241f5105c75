//! `window.localStorage` as a [`KeyValue`] backend.

use grocery_common::key_value::KeyValue;
use grocery_common::store::StoreError;

/// Handle to the page's localStorage. Looked up on every call, so it is
/// cheap to construct and copy around.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocalStorage;

#[cfg(target_family = "wasm")]
fn storage() -> Result<web_sys::Storage, StoreError> {
    let window = web_sys::window().ok_or_else(|| StoreError::Storage("No window".into()))?;
    window
        .local_storage()
        .map_err(|_| StoreError::Storage("No localStorage".into()))?
        .ok_or_else(|| StoreError::Storage("localStorage unavailable".into()))
}

#[cfg(target_family = "wasm")]
impl KeyValue for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        storage()?
            .get_item(key)
            .map_err(|e| StoreError::Storage(format!("read {key}: {e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Storage(format!("write {key}: {e:?}")))
    }
}

#[cfg(not(target_family = "wasm"))]
impl KeyValue for LocalStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Storage(
            "localStorage only available in WASM".into(),
        ))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Storage(
            "localStorage only available in WASM".into(),
        ))
    }
}
