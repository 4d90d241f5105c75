use dioxus::prelude::*;

use grocery_common::item::{GroceryItem, ItemId};
use grocery_common::list::sort_for_display;

use super::dish_recommendation::DishRecommendation;
use super::item_recommendation::ItemRecommendation;
use super::list_state::{commit, list_sync, report, use_list_state};

#[component]
pub fn GroceryList() -> Element {
    let state = use_list_state();

    let remove = move |id: ItemId| {
        spawn(async move {
            let mut items = state.read().items.clone();
            match list_sync().remove(&mut items, &id).await {
                Ok(()) => commit(state, items),
                Err(e) => report(
                    state,
                    "Error removing item",
                    "Failed to remove item. Please try again.",
                    &e,
                ),
            }
        });
    };

    let toggle = move |id: ItemId| {
        spawn(async move {
            let mut items = state.read().items.clone();
            match list_sync().toggle(&mut items, &id).await {
                Ok(_) => commit(state, items),
                Err(e) => report(
                    state,
                    "Error updating item",
                    "Failed to update item. Please try again.",
                    &e,
                ),
            }
        });
    };

    let s = state.read();
    let sorted: Vec<GroceryItem> = sort_for_display(&s.items).into_iter().cloned().collect();
    let error = s.error.clone();
    let loaded = s.loaded;
    drop(s);

    rsx! {
        div { class: "grocery-list card",
            h2 { "Grocery List" }
            div { class: "recommendations",
                ItemRecommendation {}
                DishRecommendation {}
            }
            if let Some(msg) = error {
                p { class: "error", "{msg}" }
            }
            if !loaded {
                p { class: "loading", "Loading..." }
            } else if sorted.is_empty() {
                p { class: "empty", "Your list is empty." }
            }
            ul { class: "items",
                for item in sorted {
                    li { key: "{item.id}",
                        class: if item.completed { "item completed" } else { "item" },
                        span {
                            class: "item-name",
                            onclick: {
                                let id = item.id.clone();
                                move |_| {
                                    toggle(id.clone());
                                }
                            },
                            "{item.name}"
                            if let Some(q) = item.quantity {
                                span { class: "item-quantity", " (x{q})" }
                            }
                        }
                        button {
                            class: "remove",
                            title: "Remove",
                            onclick: {
                                let id = item.id.clone();
                                move |evt: MouseEvent| {
                                    evt.stop_propagation();
                                    remove(id.clone());
                                }
                            },
                            "🗑"
                        }
                    }
                }
            }
        }
    }
}
