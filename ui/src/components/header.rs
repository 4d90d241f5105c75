use dioxus::prelude::*;

use super::app::Route;

#[component]
pub fn Header() -> Element {
    let mut country = use_signal(|| "sweden".to_string());

    rsx! {
        header { class: "app-header",
            div { class: "header-top",
                h1 { "GroceryCompare" }
                select {
                    class: "country-select",
                    value: "{country}",
                    onchange: move |evt| country.set(evt.value()),
                    option { value: "sweden", "Sweden" }
                }
            }
            nav {
                Link { to: Route::List {}, "Grocery List" }
                Link { to: Route::Supermarkets {}, "Supermarkets" }
                Link { to: Route::Compare {}, "Compare Prices" }
            }
        }
    }
}
