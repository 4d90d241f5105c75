use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique item identifier (timestamp-based, increasing within a list).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ItemId(pub String);

impl ItemId {
    /// Fresh id for a new entry in `items`.
    ///
    /// Uses the millisecond timestamp, bumped past the largest numeric id
    /// already present so two adds within the same millisecond never collide.
    /// An id at `i64::MAX` cannot be bumped past; the first free value from
    /// the timestamp on is used instead.
    pub fn next_for(items: &[GroceryItem], now: DateTime<Utc>) -> Self {
        let millis = now.timestamp_millis();
        let taken: BTreeSet<i64> = items
            .iter()
            .filter_map(|item| item.id.0.parse::<i64>().ok())
            .collect();
        let bumped = taken
            .iter()
            .filter_map(|id| id.checked_add(1))
            .max()
            .map_or(millis, |after| after.max(millis));
        let next = if taken.contains(&bumped) {
            (millis..=i64::MAX)
                .find(|n| !taken.contains(n))
                .unwrap_or(millis)
        } else {
            bumped
        };
        ItemId(next.to_string())
    }
}

// Older list dumps store ids as bare numbers (`Date.now()`), newer ones as strings.
impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => ItemId(s),
            RawId::Number(n) => ItemId(n.to_string()),
        })
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

/// An entry on the grocery list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    #[serde(alias = "_id")]
    pub id: ItemId,
    pub name: String,
    /// Checked off / already in the basket.
    #[serde(default)]
    pub completed: bool,
    /// Units wanted. `None` is priced as a single unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl GroceryItem {
    pub fn new(id: ItemId, item: NewItem) -> Self {
        Self {
            id,
            name: item.name,
            completed: false,
            quantity: item.quantity,
        }
    }

    pub fn quantity_or_one(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    /// Overwrite the fields present in `patch`.
    pub fn apply(&mut self, patch: ItemPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = Some(quantity);
        }
    }
}

/// What a caller hands to a store when adding an item. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl NewItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
        }
    }
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl ItemPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}
