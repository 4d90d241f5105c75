//! Synthetic price comparison across supermarkets.
//!
//! There is no real price source: every (supermarket, item) pair gets a random
//! price when the comparison is generated.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::item::{GroceryItem, ItemId};
use crate::key_value::{load_json, KeyValue, ITEMS_KEY};
use crate::store::StoreError;
use crate::supermarket::{load_supermarkets, Supermarket, SupermarketId};

/// Lowest generated unit price, in cents (inclusive).
pub const MIN_PRICE_CENTS: u64 = 100;
/// Highest generated unit price, in cents (exclusive).
pub const MAX_PRICE_CENTS: u64 = 1100;

/// Unit price of one item at one supermarket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub supermarket_id: SupermarketId,
    pub item_id: ItemId,
    pub price_cents: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    prices: Vec<Price>,
}

impl PriceTable {
    pub fn new(prices: Vec<Price>) -> Self {
        Self { prices }
    }

    /// One uniformly random price in `[MIN_PRICE_CENTS, MAX_PRICE_CENTS)` per pair.
    pub fn generate<R: Rng + ?Sized>(
        items: &[GroceryItem],
        supermarkets: &[Supermarket],
        rng: &mut R,
    ) -> Self {
        let prices = items
            .iter()
            .flat_map(|item| {
                supermarkets.iter().map(move |s| (item.id.clone(), s.id))
            })
            .map(|(item_id, supermarket_id)| Price {
                supermarket_id,
                item_id,
                price_cents: rng.gen_range(MIN_PRICE_CENTS..MAX_PRICE_CENTS),
            })
            .collect();
        Self { prices }
    }

    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Unit price for the pair, if one was generated.
    pub fn unit_price(&self, supermarket: SupermarketId, item: &ItemId) -> Option<u64> {
        self.prices
            .iter()
            .find(|p| p.supermarket_id == supermarket && &p.item_id == item)
            .map(|p| p.price_cents)
    }

    /// Unit price times quantity (1 when absent), or `None` when unpriced.
    pub fn line_total(&self, supermarket: SupermarketId, item: &GroceryItem) -> Option<u64> {
        self.unit_price(supermarket, &item.id)
            .map(|price| price * u64::from(item.quantity_or_one()))
    }

    /// Sum of the priced lines. Unpriced items contribute nothing.
    pub fn total_for(&self, supermarket: SupermarketId, items: &[GroceryItem]) -> u64 {
        items
            .iter()
            .filter_map(|item| self.line_total(supermarket, item))
            .sum()
    }

    /// Cheapest supermarket and its total. The earlier supermarket wins ties.
    pub fn best_deal<'a>(
        &self,
        supermarkets: &'a [Supermarket],
        items: &[GroceryItem],
    ) -> Option<(&'a Supermarket, u64)> {
        supermarkets
            .iter()
            .map(|s| (s, self.total_for(s.id, items)))
            .fold(None, |best, candidate| match best {
                Some((_, best_total)) if best_total <= candidate.1 => best,
                _ => Some(candidate),
            })
    }
}

/// Items and supermarkets as the comparison view reads them from storage.
pub fn load_comparison_inputs<K: KeyValue + ?Sized>(
    kv: &K,
) -> Result<(Vec<GroceryItem>, Vec<Supermarket>), StoreError> {
    let items = load_json(kv, ITEMS_KEY)?.unwrap_or_default();
    let supermarkets = load_supermarkets(kv)?;
    Ok((items, supermarkets))
}
