use dioxus::prelude::*;

use grocery_common::item::GroceryItem;
use grocery_common::list::{ListError, ListSync, SyncMode};

#[cfg(feature = "use-server")]
use super::api::RemoteStore;
#[cfg(not(feature = "use-server"))]
use super::browser_storage::LocalStorage;
#[cfg(not(feature = "use-server"))]
use grocery_common::key_value::KeyValueStore;

/// Where the list lives in this build.
#[cfg(not(feature = "use-server"))]
pub type ItemBackend = KeyValueStore<LocalStorage>;
#[cfg(feature = "use-server")]
pub type ItemBackend = RemoteStore;

/// localStorage has a single writer, so patching the local copy is enough.
/// The server collection may be shared, so re-read it after each change.
#[cfg(not(feature = "use-server"))]
const SYNC_MODE: SyncMode = SyncMode::Optimistic;
#[cfg(feature = "use-server")]
const SYNC_MODE: SyncMode = SyncMode::Refetch;

pub fn list_sync() -> ListSync<ItemBackend> {
    #[cfg(not(feature = "use-server"))]
    let store = KeyValueStore::new(LocalStorage);
    #[cfg(feature = "use-server")]
    let store = RemoteStore;
    ListSync::new(store, SYNC_MODE)
}

/// The grocery list as the views see it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListState {
    pub items: Vec<GroceryItem>,
    pub loaded: bool,
    /// Last user-facing failure, shown in red under the list.
    pub error: Option<String>,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current item names, oldest first, as the suggestion prompts want them.
    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|item| item.name.clone()).collect()
    }
}

pub fn use_list_state() -> Signal<ListState> {
    use_context::<Signal<ListState>>()
}

/// Item names, recomputed only when they change, not on every error or
/// loading-flag update.
pub fn use_item_names(state: Signal<ListState>) -> Memo<Vec<String>> {
    use_memo(move || state.read().names())
}

/// Load the list from the active backend once, when the app mounts.
pub fn use_list_loader(mut state: Signal<ListState>) {
    use_future(move || async move {
        match list_sync().load().await {
            Ok(items) => {
                let mut s = state.write();
                s.items = items;
                s.loaded = true;
            }
            Err(e) => {
                tracing::error!("Error loading grocery list: {e}");
                let mut s = state.write();
                s.loaded = true;
                s.error = Some("Failed to load grocery list.".into());
            }
        }
    });
}

/// Publish the list a mutation produced and hand a copy to the server.
pub fn commit(mut state: Signal<ListState>, items: Vec<GroceryItem>) {
    {
        let mut s = state.write();
        s.items = items.clone();
        s.error = None;
    }
    persist_snapshot(items);
}

/// Log `err` and show the generic `message` to the user.
pub fn report(mut state: Signal<ListState>, context: &str, message: &str, err: &ListError) {
    tracing::error!("{context}: {err}");
    state.write().error = Some(message.to_string());
}

/// Post the current list to the server's save endpoint. Failures are only logged.
pub fn persist_snapshot(items: Vec<GroceryItem>) {
    spawn(async move {
        if let Err(e) = super::api::save_snapshot(&items).await {
            tracing::warn!("Failed to save grocery list: {e}");
        }
    });
}
