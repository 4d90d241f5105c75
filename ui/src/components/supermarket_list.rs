use dioxus::prelude::*;

use grocery_common::supermarket::{
    add_supermarket, default_supermarkets, load_supermarkets, remove_supermarket,
    save_supermarkets, Supermarket, SupermarketId,
};

use super::browser_storage::LocalStorage;

fn load() -> Vec<Supermarket> {
    load_supermarkets(&LocalStorage).unwrap_or_else(|e| {
        tracing::warn!("Falling back to default supermarkets: {e}");
        default_supermarkets()
    })
}

fn save(supermarkets: &[Supermarket]) {
    if let Err(e) = save_supermarkets(&LocalStorage, supermarkets) {
        tracing::error!("Error saving supermarkets: {e}");
    }
}

#[component]
pub fn SupermarketList() -> Element {
    let mut supermarkets = use_signal(load);
    let mut new_name = use_signal(String::new);

    let mut add = move || {
        let name = new_name.read().clone();
        let mut list = supermarkets.write();
        if add_supermarket(&mut list, &name, chrono::Utc::now()).is_some() {
            save(&list);
            new_name.set(String::new());
        }
    };

    let mut remove = move |id: SupermarketId| {
        let mut list = supermarkets.write();
        if remove_supermarket(&mut list, id) {
            save(&list);
        }
    };

    let list = supermarkets.read().clone();

    rsx! {
        div { class: "supermarket-list card",
            h2 { "Supermarkets in Sweden" }
            ul {
                for supermarket in list {
                    li { key: "{supermarket.id.0}",
                        span { "{supermarket.name}" }
                        button {
                            class: "remove",
                            title: "Remove",
                            onclick: move |_| remove(supermarket.id),
                            "🗑"
                        }
                    }
                }
            }
            div { class: "add-supermarket",
                input {
                    r#type: "text",
                    placeholder: "Add a supermarket",
                    value: "{new_name}",
                    oninput: move |evt| new_name.set(evt.value()),
                    onkeydown: move |evt: KeyboardEvent| {
                        if evt.key() == Key::Enter {
                            add();
                        }
                    },
                }
                button {
                    disabled: new_name.read().trim().is_empty(),
                    onclick: move |_| add(),
                    "Add"
                }
            }
        }
    }
}
