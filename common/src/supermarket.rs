use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::key_value::{load_json, save_json, KeyValue, SUPERMARKETS_KEY};
use crate::store::StoreError;

/// Supermarket identifier. Seed entries use 1–4, user-added ones a millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SupermarketId(pub u64);

/// A supermarket prices are compared across.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supermarket {
    pub id: SupermarketId,
    pub name: String,
}

impl Supermarket {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: SupermarketId(id),
            name: name.into(),
        }
    }
}

/// The list shown before the user has stored their own.
pub fn default_supermarkets() -> Vec<Supermarket> {
    vec![
        Supermarket::new(1, "Willys"),
        Supermarket::new(2, "Ica"),
        Supermarket::new(3, "Lidl"),
        Supermarket::new(4, "Coop"),
    ]
}

/// Stored supermarkets, or the default seed list when nothing is stored yet.
pub fn load_supermarkets<K: KeyValue + ?Sized>(kv: &K) -> Result<Vec<Supermarket>, StoreError> {
    Ok(load_json(kv, SUPERMARKETS_KEY)?.unwrap_or_else(default_supermarkets))
}

pub fn save_supermarkets<K: KeyValue + ?Sized>(
    kv: &K,
    supermarkets: &[Supermarket],
) -> Result<(), StoreError> {
    save_json(kv, SUPERMARKETS_KEY, supermarkets)
}

/// Append a supermarket named `name` (trimmed). Blank names are ignored.
pub fn add_supermarket<'a>(
    supermarkets: &'a mut Vec<Supermarket>,
    name: &str,
    now: DateTime<Utc>,
) -> Option<&'a Supermarket> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let taken = |id: u64| supermarkets.iter().any(|s| s.id.0 == id);
    let bumped = supermarkets
        .iter()
        .filter_map(|s| s.id.0.checked_add(1))
        .max()
        .map_or(millis, |after_latest| after_latest.max(millis));
    let next = if taken(bumped) {
        (millis..=u64::MAX).find(|&n| !taken(n)).unwrap_or(millis)
    } else {
        bumped
    };
    supermarkets.push(Supermarket::new(next, name));
    supermarkets.last()
}

/// Remove the supermarket with `id`. Returns whether it was present.
pub fn remove_supermarket(supermarkets: &mut Vec<Supermarket>, id: SupermarketId) -> bool {
    let before = supermarkets.len();
    supermarkets.retain(|s| s.id != id);
    supermarkets.len() < before
}
