//! Keeping the list the user sees in step with an [`ItemStore`].
//!
//! The view owns a local copy of the list. After each mutation it either
//! patches that copy with what the store returned ([`SyncMode::Optimistic`]) or
//! throws it away and reads the store again ([`SyncMode::Refetch`]).

use crate::item::{GroceryItem, ItemId, ItemPatch, NewItem};
use crate::store::{ItemStore, StoreError};

/// Names must be longer than this once trimmed.
pub const MIN_NAME_CHARS: usize = 2;

/// Rejected user input. Nothing reaches the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputError {
    TooShort { chars: usize },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort { chars } => write!(
                f,
                "item name must be longer than {MIN_NAME_CHARS} characters (got {chars})"
            ),
        }
    }
}

impl std::error::Error for InputError {}

/// A typed item name that passed input validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemName(String);

impl ItemName {
    pub fn parse(input: &str) -> Result<Self, InputError> {
        let trimmed = input.trim();
        let chars = trimmed.chars().count();
        if chars <= MIN_NAME_CHARS {
            return Err(InputError::TooShort { chars });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Incomplete items first, completed after; original order kept within each group.
pub fn sort_for_display(items: &[GroceryItem]) -> Vec<&GroceryItem> {
    let mut sorted: Vec<&GroceryItem> = items.iter().collect();
    sorted.sort_by_key(|item| item.completed);
    sorted
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Patch the local list with the store's answer.
    #[default]
    Optimistic,
    /// Reload the whole list from the store after every mutation.
    Refetch,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListError {
    Input(InputError),
    Store(StoreError),
    NotFound(ItemId),
}

impl std::fmt::Display for ListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(e) => write!(f, "{e}"),
            Self::Store(e) => write!(f, "{e}"),
            Self::NotFound(id) => write!(f, "item {id} not found"),
        }
    }
}

impl std::error::Error for ListError {}

impl From<InputError> for ListError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<StoreError> for ListError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

/// Applies list mutations to a store and to the caller's local copy.
///
/// On error the local list is left as it was. Once a mutation has been stored
/// it is reported as done even if the follow-up reload fails; the local list
/// is then patched as in [`SyncMode::Optimistic`].
pub struct ListSync<S> {
    store: S,
    mode: SyncMode,
}

impl<S: ItemStore> ListSync<S> {
    pub fn new(store: S, mode: SyncMode) -> Self {
        Self { store, mode }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub async fn load(&self) -> Result<Vec<GroceryItem>, ListError> {
        Ok(self.store.list().await?)
    }

    /// Add what the user typed. Names of two characters or fewer never reach the store.
    pub async fn add_typed(
        &self,
        items: &mut Vec<GroceryItem>,
        input: &str,
    ) -> Result<GroceryItem, ListError> {
        let name = ItemName::parse(input)?;
        self.add_suggested(items, NewItem::named(name.into_inner())).await
    }

    /// Add without input validation (accepted suggestions).
    pub async fn add_suggested(
        &self,
        items: &mut Vec<GroceryItem>,
        item: NewItem,
    ) -> Result<GroceryItem, ListError> {
        let created = self.store.add(item).await?;
        self.absorb(items, std::slice::from_ref(&created)).await;
        Ok(created)
    }

    /// Add several names in order, e.g. the ingredients of a dish.
    ///
    /// Stops at the first store failure; items added before it stay added.
    pub async fn add_many(
        &self,
        items: &mut Vec<GroceryItem>,
        names: Vec<String>,
    ) -> Result<Vec<GroceryItem>, ListError> {
        let mut created = Vec::with_capacity(names.len());
        for name in names {
            match self.store.add(NewItem::named(name)).await {
                Ok(item) => created.push(item),
                Err(e) => {
                    self.absorb(items, &created).await;
                    return Err(e.into());
                }
            }
        }
        self.absorb(items, &created).await;
        Ok(created)
    }

    pub async fn remove(
        &self,
        items: &mut Vec<GroceryItem>,
        id: &ItemId,
    ) -> Result<(), ListError> {
        if !self.store.remove(id).await? {
            return Err(ListError::NotFound(id.clone()));
        }
        if !self.reload(items).await {
            items.retain(|item| &item.id != id);
        }
        Ok(())
    }

    /// Flip the completion flag, based on the flag the user is looking at.
    pub async fn toggle(
        &self,
        items: &mut Vec<GroceryItem>,
        id: &ItemId,
    ) -> Result<GroceryItem, ListError> {
        let shown = items
            .iter()
            .find(|item| &item.id == id)
            .map(|item| item.completed)
            .ok_or_else(|| ListError::NotFound(id.clone()))?;

        let updated = self
            .store
            .update(id, ItemPatch::completed(!shown))
            .await?
            .ok_or_else(|| ListError::NotFound(id.clone()))?;

        if !self.reload(items).await {
            if let Some(item) = items.iter_mut().find(|item| &item.id == id) {
                *item = updated.clone();
            }
        }
        Ok(updated)
    }

    // In refetch mode, replace the local list with the store's. False when the
    // caller still has to patch it: optimistic mode, or the reload failed after
    // the mutation already went through.
    async fn reload(&self, items: &mut Vec<GroceryItem>) -> bool {
        if self.mode != SyncMode::Refetch {
            return false;
        }
        match self.store.list().await {
            Ok(fresh) => {
                *items = fresh;
                true
            }
            Err(_) => false,
        }
    }

    async fn absorb(&self, items: &mut Vec<GroceryItem>, created: &[GroceryItem]) {
        if !self.reload(items).await {
            items.extend_from_slice(created);
        }
    }
}
