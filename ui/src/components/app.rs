use dioxus::prelude::*;

use super::grocery_list::GroceryList;
use super::header::Header;
use super::list_state::{use_list_loader, ListState};
use super::price_comparison::PriceComparison;
use super::supermarket_list::SupermarketList;

#[derive(Clone, Debug, PartialEq, Routable)]
pub enum Route {
    #[layout(AppLayout)]
    #[route("/")]
    List {},
    #[route("/supermarkets")]
    Supermarkets {},
    #[route("/compare")]
    Compare {},
}

#[component]
pub fn App() -> Element {
    let state = use_context_provider(|| Signal::new(ListState::new()));
    use_list_loader(state);

    rsx! { Router::<Route> {} }
}

#[component]
fn AppLayout() -> Element {
    rsx! {
        div { class: "grocery-app",
            Header {}
            main { class: "app-main",
                Outlet::<Route> {}
            }
            footer { class: "app-footer",
                p { "Prices are simulated and for comparison only." }
            }
        }
    }
}

/// Route component: the shopping list with suggestions.
#[component]
fn List() -> Element {
    rsx! { GroceryList {} }
}

#[component]
fn Supermarkets() -> Element {
    rsx! { SupermarketList {} }
}

/// Route component: per-supermarket price table.
#[component]
fn Compare() -> Element {
    rsx! { PriceComparison {} }
}
