use dioxus::prelude::*;

use grocery_common::item::NewItem;
use grocery_common::list::{ItemName, ListError};

use super::api;
use super::list_state::{commit, list_sync, use_item_names, use_list_state};

const FETCH_FAILED: &str = "Failed to fetch recommended item. Please try again.";
const ADD_FAILED: &str = "Failed to add item. Please try again.";

/// What to add and how it was entered.
enum Addition {
    Suggested(String),
    Typed(String),
}

/// Suggests one item for the current list and takes typed additions.
#[component]
pub fn ItemRecommendation() -> Element {
    let state = use_list_state();
    let mut recommended = use_signal(String::new);
    let mut image_url = use_signal(|| None::<String>);
    let mut new_name = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let names = use_item_names(state);

    // Ask again whenever the item names change.
    use_effect(move || {
        let names = names.read().clone();
        spawn(async move {
            loading.set(true);
            error.set(None);
            match api::suggest_item(&names).await {
                Ok(item) => {
                    recommended.set(item.clone());
                    match api::item_image(&item).await {
                        Ok(url) => image_url.set(Some(url)),
                        Err(e) => {
                            tracing::warn!("No image for {item}: {e}");
                            image_url.set(None);
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Error fetching recommended item: {e}");
                    error.set(Some(FETCH_FAILED.to_string()));
                }
            }
            loading.set(false);
        });
    });

    let add = move |addition: Addition| {
        spawn(async move {
            loading.set(true);
            error.set(None);
            let sync = list_sync();
            let mut items = state.read().items.clone();
            let result = match &addition {
                Addition::Suggested(name) => sync
                    .add_suggested(&mut items, NewItem::named(name.clone()))
                    .await
                    .map(|_| ()),
                Addition::Typed(input) => sync.add_typed(&mut items, input).await.map(|_| ()),
            };
            match result {
                Ok(()) => {
                    if matches!(addition, Addition::Typed(_)) {
                        new_name.set(String::new());
                    }
                    commit(state, items);
                }
                Err(ListError::Input(e)) => tracing::warn!("Ignoring item name: {e}"),
                Err(e) => {
                    tracing::error!("Error adding item: {e}");
                    error.set(Some(ADD_FAILED.to_string()));
                }
            }
            loading.set(false);
        });
    };

    let recommended_now = recommended.read().clone();
    let typed_ok = ItemName::parse(&new_name.read()).is_ok();
    let is_loading = loading();

    rsx! {
        div { class: "item-recommendation panel",
            h3 { "Item Recommendation" }
            if is_loading {
                p { class: "loading", "Loading..." }
            }
            if let Some(msg) = error() {
                p { class: "error", "{msg}" }
            }
            div { class: "suggestion",
                div { class: "suggestion-image",
                    if let Some(url) = image_url() {
                        img { src: "{url}", alt: "{recommended_now}" }
                    } else {
                        span { class: "suggestion-icon", "🛒" }
                    }
                }
                p { class: "suggestion-name",
                    if recommended_now.is_empty() { "Loading..." } else { "{recommended_now}" }
                }
                button {
                    class: "add-suggestion",
                    disabled: recommended_now.is_empty() || is_loading,
                    onclick: {
                        let item = recommended_now.clone();
                        move |_| add(Addition::Suggested(item.clone()))
                    },
                    if recommended_now.is_empty() {
                        "Add recommended item"
                    } else {
                        "Add {recommended_now}"
                    }
                }
            }
            div { class: "custom-item",
                input {
                    r#type: "text",
                    placeholder: "Enter item name",
                    value: "{new_name}",
                    oninput: move |evt| new_name.set(evt.value()),
                    onkeydown: move |evt: KeyboardEvent| {
                        if evt.key() == Key::Enter {
                            add(Addition::Typed(new_name.read().clone()));
                        }
                    },
                }
                button {
                    disabled: !typed_ok || is_loading,
                    onclick: move |_| add(Addition::Typed(new_name.read().clone())),
                    "Add"
                }
            }
        }
    }
}
