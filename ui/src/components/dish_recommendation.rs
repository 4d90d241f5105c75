use dioxus::prelude::*;

use super::api;
use super::list_state::{commit, list_sync, report, use_item_names, use_list_state};

/// Suggests a dish from the list and adds its missing ingredients in one go.
#[component]
pub fn DishRecommendation() -> Element {
    let state = use_list_state();
    let mut dish = use_signal(String::new);
    let mut adding = use_signal(|| false);

    let names = use_item_names(state);

    // Ask again whenever the item names change.
    use_effect(move || {
        let names = names.read().clone();
        spawn(async move {
            match api::suggest_dish(&names).await {
                Ok(suggestion) => dish.set(suggestion),
                Err(e) => tracing::error!("Error fetching recommended dish: {e}"),
            }
        });
    });

    let add_ingredients = move |_: MouseEvent| {
        let current = dish.read().clone();
        if current.is_empty() {
            return;
        }
        spawn(async move {
            adding.set(true);
            let names = state.read().names();
            match api::dish_ingredients(&current, &names).await {
                Ok(ingredients) => {
                    let mut items = state.read().items.clone();
                    let result = list_sync().add_many(&mut items, ingredients).await;
                    // Ingredients stored before a failure stay on the list.
                    commit(state, items);
                    if let Err(e) = result {
                        report(
                            state,
                            "Error adding dish ingredients",
                            "Failed to add ingredients. Please try again.",
                            &e,
                        );
                    }
                }
                Err(e) => tracing::error!("Error fetching ingredients for {current}: {e}"),
            }
            adding.set(false);
        });
    };

    let current = dish.read().clone();
    let label = if current.is_empty() {
        "recommended dish".to_string()
    } else {
        current.clone()
    };

    rsx! {
        div { class: "dish-recommendation",
            button {
                class: "add-dish",
                disabled: current.is_empty() || adding(),
                onclick: add_ingredients,
                if adding() { "Adding ingredients..." } else { "Add ingredients for {label}" }
            }
        }
    }
}
